//! Terminal rendering for the drill.

use std::io::{self, Write};

use comfy_table::{Cell, Table};

use recite_core::engine::{Notice, NoticeLevel, Transition};
use recite_core::judge::AiVerdict;
use recite_core::model::{Selection, UnitFilter};
use recite_core::parser::QuizBank;
use recite_core::pool::UnitCatalog;
use recite_core::session::{QuizSession, SessionTally};
use recite_core::view::PageView;

pub fn notices(out: &mut impl Write, notices: &[Notice]) -> io::Result<()> {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        writeln!(out, "[{tag}] {notice}")?;
    }
    Ok(())
}

pub fn page(out: &mut impl Write, page: &PageView) -> io::Result<()> {
    let (position, total) = page.position;
    writeln!(out)?;
    writeln!(out, "[{}]  ({position}/{total})", page.caption)?;
    writeln!(out, "  {}", page.prompt)?;
    if let Some(wrong) = &page.wrong_answer {
        writeln!(out, "  Your answer: {wrong}")?;
    }
    if let Some(reference) = &page.reference {
        writeln!(out, "  Answer:      {reference}")?;
    }
    match &page.note {
        Some(note) => {
            writeln!(out, "  Note:")?;
            for line in note.lines() {
                writeln!(out, "    {line}")?;
            }
        }
        None => writeln!(out, "  No learning note for this unit.")?,
    }
    if page.can_graduate {
        writeln!(out, "  Type :grad to mark this sentence as mastered.")?;
    }
    writeln!(out, "{} · {}", page.placeholder, page.submit_label)?;
    Ok(())
}

/// The current page, or a hint when the pool is empty.
pub fn current_page(out: &mut impl Write, session: &QuizSession, bank: &QuizBank) -> io::Result<()> {
    match PageView::build(session, bank) {
        Some(view) => page(out, &view),
        None => writeln!(
            out,
            "\nNothing to study. Change the selection with :unit, :review, :normal or :mastered, or :quit."
        ),
    }
}

/// Grading details for an answered question.
pub fn transition(out: &mut impl Write, transition: &Transition) -> io::Result<()> {
    match transition {
        Transition::Accepted { verdict, score } | Transition::Rejected { verdict, score } => {
            let verdict = match verdict {
                AiVerdict::Correct => "O",
                AiVerdict::Incorrect => "X",
                AiVerdict::Unavailable => "unavailable",
            };
            writeln!(out, "  (similarity {score:.2}, AI verdict {verdict})")
        }
        _ => Ok(()),
    }
}

/// Every minor unit in the bank with its question count.
pub fn unit_table(bank: &QuizBank) -> Table {
    let catalog = UnitCatalog::new(&bank.questions);
    let mut table = Table::new();
    table.set_header(vec!["Major", "Middle", "Minor", "Questions", "Note"]);

    for major in catalog.majors() {
        let major = Selection::Only(major);
        for middle in catalog.middles(&major) {
            let middle = Selection::Only(middle);
            for minor in catalog.minors(&major, &middle) {
                let filter = UnitFilter {
                    major: major.clone(),
                    middle: middle.clone(),
                    minor: Selection::Only(minor.clone()),
                };
                let key = recite_core::model::unit_key(
                    &major.to_string(),
                    &middle.to_string(),
                    &minor,
                );
                table.add_row(vec![
                    Cell::new(&major),
                    Cell::new(&middle),
                    Cell::new(&minor),
                    Cell::new(catalog.count(&filter)),
                    Cell::new(if bank.description(&key).is_some() { "yes" } else { "" }),
                ]);
            }
        }
    }
    table
}

pub fn summary(tally: &SessionTally, elapsed: chrono::Duration) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Answered", "Correct", "Blank", "Corrected", "Mastered", "Time"]);
    let minutes = elapsed.num_minutes();
    let seconds = elapsed.num_seconds() - minutes * 60;
    table.add_row(vec![
        Cell::new(tally.answered),
        Cell::new(tally.accepted),
        Cell::new(tally.missed),
        Cell::new(tally.corrected),
        Cell::new(tally.graduated),
        Cell::new(format!("{minutes}m {seconds:02}s")),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use recite_core::model::PoolSelection;
    use recite_core::parser::parse_bank_str;

    fn rendered(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn answering_page_layout() {
        let bank = parse_bank_str("[Tenses > Past > Regular]\n#Add -ed.\nI walked.|나는 걸었다.\n");
        let session = QuizSession::new(PoolSelection::default(), bank.questions.clone());
        let text = rendered(|out| current_page(out, &session, &bank));
        assert!(text.contains("[Tenses > Past > Regular]  (1/1)"));
        assert!(text.contains("나는 걸었다."));
        assert!(text.contains("Add -ed."));
        assert!(text.contains("Translate into English"));
        assert!(!text.contains("Answer:"));
    }

    #[test]
    fn empty_pool_hint() {
        let bank = QuizBank::default();
        let session = QuizSession::new(PoolSelection::default(), vec![]);
        let text = rendered(|out| current_page(out, &session, &bank));
        assert!(text.contains("Nothing to study"));
    }

    #[test]
    fn notice_tags() {
        let text = rendered(|out| {
            notices(out, &[Notice::success("Correct!"), Notice::error("Could not save")])
        });
        assert_eq!(text, "[ok] Correct!\n[error] Could not save\n");
    }

    #[test]
    fn unit_table_lists_each_minor() {
        let bank = parse_bank_str(
            "[Tenses > Past > Regular]\n#note\na|가\nb|나\n[Tenses > Past > Irregular]\nc|다\n[Asking > Wh]\nd|라\n",
        );
        let text = unit_table(&bank).to_string();
        assert!(text.contains("Regular"));
        assert!(text.contains("Irregular"));
        assert!(text.contains("Asking"));
        assert!(text.contains("yes"));
    }

    #[test]
    fn summary_formats_elapsed_time() {
        let tally = SessionTally {
            answered: 3,
            accepted: 2,
            ..Default::default()
        };
        let text = summary(&tally, chrono::Duration::seconds(125)).to_string();
        assert!(text.contains("2m 05s"));
    }
}
