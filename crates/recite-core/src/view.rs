//! What the quiz page shows for a session.
//!
//! Front ends render a `PageView`; the labels and conditional panels depend
//! only on the session step, the study mode, and the bank's learning notes.

use crate::model::StudyMode;
use crate::parser::QuizBank;
use crate::session::{QuizSession, Step};

/// Shown when the learner submitted nothing.
pub const BLANK_ANSWER_LABEL: &str = "(blank)";

/// A renderer-agnostic snapshot of the quiz page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Unit path, or a review-mode caption.
    pub caption: String,
    /// The Korean sentence to translate.
    pub prompt: String,
    pub placeholder: &'static str,
    pub submit_label: &'static str,
    /// The rejected answer, during correction.
    pub wrong_answer: Option<String>,
    /// The reference answer, during correction and after a correct answer.
    pub reference: Option<String>,
    /// Whether the graduate action is offered.
    pub can_graduate: bool,
    /// Learning note for the current unit.
    pub note: Option<String>,
    /// 1-based position and pool size.
    pub position: (usize, usize),
}

impl PageView {
    /// Build the page for the session's current question, or `None` if the
    /// pool is empty.
    pub fn build(session: &QuizSession, bank: &QuizBank) -> Option<Self> {
        let question = session.current()?;
        let step = session.step();
        let mode = session.selection().mode;

        let (placeholder, submit_label) = match step {
            Step::Answering => ("Translate into English", "Check answer (Enter)"),
            Step::Correction => ("Type the answer above exactly", "Confirm (Enter)"),
            Step::Completed => ("Correct! Press Enter for the next question", "Next question (Enter)"),
        };

        let caption = match mode {
            StudyMode::Review => "Reviewing incorrect answers".to_string(),
            StudyMode::Normal => question.unit_path(),
        };

        Some(Self {
            caption,
            prompt: question.kor.clone(),
            placeholder,
            submit_label,
            wrong_answer: (step == Step::Correction).then(|| {
                session
                    .last_wrong_input()
                    .unwrap_or(BLANK_ANSWER_LABEL)
                    .to_string()
            }),
            reference: (step != Step::Answering).then(|| question.eng.clone()),
            can_graduate: step == Step::Completed && mode == StudyMode::Normal,
            note: bank.description(&question.key).map(str::to_string),
            position: (session.index() + 1, session.pool().len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PoolSelection;
    use crate::parser::parse_bank_str;

    fn setup() -> (QuizBank, QuizSession) {
        let bank = parse_bank_str("[A>B>C]\n#note\nhello|안녕\n[D]\nbye|잘 가\n");
        let session = QuizSession::new(PoolSelection::default(), bank.questions.clone());
        (bank, session)
    }

    #[test]
    fn answering_page() {
        let (bank, session) = setup();
        let page = PageView::build(&session, &bank).unwrap();
        assert_eq!(page.prompt, "안녕");
        assert_eq!(page.caption, "A > B > C");
        assert_eq!(page.submit_label, "Check answer (Enter)");
        assert!(page.wrong_answer.is_none());
        assert!(page.reference.is_none());
        assert!(!page.can_graduate);
        assert_eq!(page.note.as_deref(), Some("note"));
        assert_eq!(page.position, (1, 2));
    }

    #[test]
    fn correction_page_shows_blank_label() {
        let (bank, mut session) = setup();
        session.enter_correction(None);
        let page = PageView::build(&session, &bank).unwrap();
        assert_eq!(page.wrong_answer.as_deref(), Some(BLANK_ANSWER_LABEL));
        assert_eq!(page.reference.as_deref(), Some("hello"));
        assert_eq!(page.placeholder, "Type the answer above exactly");
    }

    #[test]
    fn completed_page_offers_graduation() {
        let (bank, mut session) = setup();
        session.complete();
        let page = PageView::build(&session, &bank).unwrap();
        assert!(page.can_graduate);
        assert_eq!(page.submit_label, "Next question (Enter)");
    }

    #[test]
    fn unit_without_note() {
        let (bank, mut session) = setup();
        session.advance();
        let page = PageView::build(&session, &bank).unwrap();
        assert!(page.note.is_none());
    }

    #[test]
    fn empty_pool_has_no_page() {
        let bank = QuizBank::default();
        let session = QuizSession::new(PoolSelection::default(), vec![]);
        assert!(PageView::build(&session, &bank).is_none());
    }
}
