//! Pool filtering and unit catalog.

use std::collections::{BTreeSet, HashSet};

use crate::model::{QuestionRecord, RecordIdentity, Selection, UnitFilter};

/// Identities of mastered rows, skipping rows with a blank key or sentence.
pub fn mastered_signatures(mastered: &[QuestionRecord]) -> HashSet<RecordIdentity> {
    mastered
        .iter()
        .map(QuestionRecord::identity)
        .filter(|id| !id.is_blank())
        .collect()
}

/// Select the bank records for a normal-mode session.
pub fn filter_pool(
    bank: &[QuestionRecord],
    units: &UnitFilter,
    mastered: &[QuestionRecord],
    include_mastered: bool,
) -> Vec<QuestionRecord> {
    let signatures = if include_mastered {
        HashSet::new()
    } else {
        mastered_signatures(mastered)
    };

    bank.iter()
        .filter(|q| units.matches(q))
        .filter(|q| include_mastered || !signatures.contains(&q.identity()))
        .cloned()
        .collect()
}

/// Cascading unit options for a bank.
pub struct UnitCatalog<'a> {
    questions: &'a [QuestionRecord],
}

impl<'a> UnitCatalog<'a> {
    pub fn new(questions: &'a [QuestionRecord]) -> Self {
        Self { questions }
    }

    /// Sorted distinct majors.
    pub fn majors(&self) -> Vec<String> {
        self.distinct(|_| true, |q| &q.major)
    }

    /// Middles under `major` (every middle when `major` is "all").
    pub fn middles(&self, major: &Selection) -> Vec<String> {
        self.distinct(|q| major.matches(&q.major), |q| &q.middle)
    }

    /// Minors under `major`/`middle`. A major of "all" lists every minor and
    /// ignores `middle`.
    pub fn minors(&self, major: &Selection, middle: &Selection) -> Vec<String> {
        if major.is_all() {
            return self.distinct(|_| true, |q| &q.minor);
        }
        self.distinct(
            |q| major.matches(&q.major) && middle.matches(&q.middle),
            |q| &q.minor,
        )
    }

    /// Number of records matching a filter.
    pub fn count(&self, units: &UnitFilter) -> usize {
        self.questions.iter().filter(|q| units.matches(q)).count()
    }

    fn distinct<P, F>(&self, keep: P, field: F) -> Vec<String>
    where
        P: Fn(&QuestionRecord) -> bool,
        F: Fn(&QuestionRecord) -> &String,
    {
        self.questions
            .iter()
            .filter(|&q| keep(q))
            .map(|q| field(q).clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> Vec<QuestionRecord> {
        vec![
            QuestionRecord::new("Tenses", "Past", "Regular", "I walked.", "나는 걸었다."),
            QuestionRecord::new("Tenses", "Past", "Irregular", "I went.", "나는 갔다."),
            QuestionRecord::new("Tenses", "Future", "Will", "I will go.", "나는 갈 것이다."),
            QuestionRecord::new("Questions", "Wh", "Where", "Where are you?", "어디야?"),
        ]
    }

    #[test]
    fn filter_by_units() {
        let bank = bank();
        let units: UnitFilter = "Tenses > Past".parse().unwrap();
        let pool = filter_pool(&bank, &units, &[], false);
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|q| q.middle == "Past"));

        let all = filter_pool(&bank, &UnitFilter::all(), &[], false);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn mastered_excluded_despite_padding() {
        let bank = bank();
        let mut mastered_row = bank[1].clone();
        mastered_row.key = format!("  {} ", mastered_row.key);
        mastered_row.eng = format!("{}   ", mastered_row.eng);

        let pool = filter_pool(&bank, &UnitFilter::all(), &[mastered_row.clone()], false);
        assert_eq!(pool.len(), 3);
        assert!(pool.iter().all(|q| q.identity() != bank[1].identity()));

        let with_mastered = filter_pool(&bank, &UnitFilter::all(), &[mastered_row], true);
        assert_eq!(with_mastered.len(), 4);
    }

    #[test]
    fn blank_mastered_rows_are_ignored() {
        let blank = QuestionRecord {
            key: "  ".into(),
            eng: "I walked.".into(),
            ..bank()[0].clone()
        };
        assert!(mastered_signatures(&[blank]).is_empty());
    }

    #[test]
    fn catalog_cascades() {
        let bank = bank();
        let catalog = UnitCatalog::new(&bank);
        assert_eq!(catalog.majors(), vec!["Questions", "Tenses"]);
        assert_eq!(
            catalog.middles(&Selection::Only("Tenses".into())),
            vec!["Future", "Past"]
        );
        assert_eq!(catalog.middles(&Selection::All).len(), 3);
        assert_eq!(
            catalog.minors(&Selection::Only("Tenses".into()), &Selection::Only("Past".into())),
            vec!["Irregular", "Regular"]
        );
        assert_eq!(
            catalog.minors(&Selection::Only("Tenses".into()), &Selection::All),
            vec!["Irregular", "Regular", "Will"]
        );
        assert_eq!(
            catalog.minors(&Selection::All, &Selection::Only("Past".into())).len(),
            4
        );
        assert_eq!(catalog.count(&"Tenses".parse().unwrap()), 3);
    }
}
