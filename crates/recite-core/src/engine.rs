//! The quiz engine.
//!
//! Handlers take the session explicitly, perform the store and AI calls one
//! at a time, and return the resulting transition plus the notices to show
//! the learner. Store failures never abort a handler: they become error
//! notices and the session still moves on locally.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;

use crate::error::SessionError;
use crate::grading::{Grade, Grader};
use crate::judge::AiVerdict;
use crate::model::{PoolSelection, ProgressTable, QuestionRecord, StudyMode};
use crate::parser::QuizBank;
use crate::pool::filter_pool;
use crate::session::{QuizSession, Step};
use crate::traits::{AddOutcome, ProgressStore};

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A short message for the learner, shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What a submit or graduate did.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Blank answer; now in correction.
    Missed,
    /// Answer accepted; now completed.
    Accepted { verdict: AiVerdict, score: f64 },
    /// Answer rejected; now in correction.
    Rejected { verdict: AiVerdict, score: f64 },
    /// Correction copied; advanced to the next question.
    CorrectionPassed,
    /// Correction did not match; still in correction.
    CorrectionFailed,
    /// Moved on from a completed question.
    Advanced,
    /// Moved into the mastered set; advanced.
    Graduated,
}

/// Result of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub transition: Transition,
    pub notices: Vec<Notice>,
}

/// Drives quiz sessions against a bank, a grader and a progress store.
pub struct QuizEngine {
    bank: QuizBank,
    grader: Grader,
    store: Arc<dyn ProgressStore>,
}

impl QuizEngine {
    pub fn new(bank: QuizBank, grader: Grader, store: Arc<dyn ProgressStore>) -> Self {
        Self {
            bank,
            grader,
            store,
        }
    }

    pub fn bank(&self) -> &QuizBank {
        &self.bank
    }

    pub fn grader(&self) -> &Grader {
        &self.grader
    }

    pub fn store(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    /// Compute the pool for a selection.
    pub async fn build_pool(&self, selection: &PoolSelection) -> (Vec<QuestionRecord>, Vec<Notice>) {
        let mut notices = Vec::new();

        let pool = match selection.mode {
            StudyMode::Review => {
                let pool = self.list_or_empty(ProgressTable::Incorrect, &mut notices).await;
                if pool.is_empty() {
                    notices.push(Notice::success("The review queue is empty!"));
                } else {
                    notices.push(Notice::info(format!(
                        "Reviewing {} incorrect sentence(s)",
                        pool.len()
                    )));
                }
                pool
            }
            StudyMode::Normal => {
                let mastered = if selection.include_mastered {
                    Vec::new()
                } else {
                    self.list_or_empty(ProgressTable::Mastered, &mut notices).await
                };
                let pool = filter_pool(
                    &self.bank.questions,
                    &selection.units,
                    &mastered,
                    selection.include_mastered,
                );
                if pool.is_empty() {
                    notices.push(Notice::warning("No questions match this selection."));
                } else {
                    notices.push(Notice::info(format!("{} question(s) to study", pool.len())));
                }
                pool
            }
        };

        (pool, notices)
    }

    /// Start a session for a selection.
    pub async fn open(&self, selection: PoolSelection) -> (QuizSession, Vec<Notice>) {
        let (pool, notices) = self.build_pool(&selection).await;
        let session = QuizSession::new(selection, pool);
        tracing::info!(session = %session.id, pool = session.pool().len(), "session opened");
        (session, notices)
    }

    /// Switch a session to a new selection. An equivalent selection is stored
    /// but keeps the session where it is.
    pub async fn reselect(&self, session: &mut QuizSession, selection: PoolSelection) -> Vec<Notice> {
        if same_pool(session.selection(), &selection) {
            session.set_selection(selection);
            return Vec::new();
        }
        let (pool, notices) = self.build_pool(&selection).await;
        session.reset(selection, pool);
        tracing::info!(session = %session.id, pool = session.pool().len(), "selection changed");
        notices
    }

    /// Handle the submit action for the current step.
    #[instrument(skip_all, fields(session = %session.id, step = %session.step()))]
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        input: &str,
    ) -> Result<Outcome, SessionError> {
        let question = session.current().cloned().ok_or(SessionError::EmptyPool)?;
        let mut notices = Vec::new();

        let transition = match session.step() {
            Step::Answering => {
                session.tally.answered += 1;
                match self.grader.grade(&question, input).await {
                    Grade::Blank => {
                        session.tally.missed += 1;
                        tracing::info!(key = %question.key, eng = %question.eng, "missed attempt: blank answer");
                        self.record_incorrect(&question, &mut notices).await;
                        session.enter_correction(None);
                        notices.push(Notice::info(
                            "Blank answer! Type the correct answer to continue.",
                        ));
                        Transition::Missed
                    }
                    Grade::Graded {
                        verdict,
                        score,
                        accepted: true,
                    } => {
                        session.tally.accepted += 1;
                        session.complete();
                        notices.push(Notice::success("Correct!"));
                        if session.selection().mode == StudyMode::Review
                            && self
                                .remove_from(ProgressTable::Incorrect, &question, &mut notices)
                                .await
                        {
                            session.retire_current();
                            notices.push(Notice::success("Removed from the review queue."));
                        }
                        Transition::Accepted { verdict, score }
                    }
                    Grade::Graded { verdict, score, .. } => {
                        tracing::info!(key = %question.key, ?verdict, score, "answer rejected");
                        self.record_incorrect(&question, &mut notices).await;
                        session.enter_correction(Some(input.to_string()));
                        notices.push(Notice::warning(
                            "Incorrect! Type the correct answer to learn it.",
                        ));
                        Transition::Rejected { verdict, score }
                    }
                }
            }
            Step::Correction => {
                if self.grader.grade_correction(&question, input) {
                    session.tally.corrected += 1;
                    notices.push(Notice::success("Well done! On to the next question."));
                    self.advance(session, &mut notices);
                    Transition::CorrectionPassed
                } else {
                    notices.push(Notice::warning(
                        "Not quite. Type the correct answer exactly as shown.",
                    ));
                    Transition::CorrectionFailed
                }
            }
            Step::Completed => {
                self.advance(session, &mut notices);
                Transition::Advanced
            }
        };

        Ok(Outcome {
            transition,
            notices,
        })
    }

    /// Move the completed question into the mastered set and advance.
    #[instrument(skip_all, fields(session = %session.id))]
    pub async fn graduate(&self, session: &mut QuizSession) -> Result<Outcome, SessionError> {
        let question = session.current().cloned().ok_or(SessionError::EmptyPool)?;
        if session.step() != Step::Completed || session.selection().mode != StudyMode::Normal {
            return Err(SessionError::GraduateUnavailable);
        }

        let mut notices = Vec::new();
        let saved = match self.store.add(ProgressTable::Mastered, &question).await {
            Ok(outcome) => {
                tracing::debug!(?outcome, "added to mastered");
                true
            }
            Err(e) => {
                store_failure("save to", ProgressTable::Mastered, &e, &mut notices);
                false
            }
        };
        self.remove_from(ProgressTable::Incorrect, &question, &mut notices)
            .await;

        if saved && !session.selection().include_mastered {
            session.retire_current();
        }
        session.tally.graduated += 1;
        tracing::info!(key = %question.key, eng = %question.eng, "graduated");
        notices.push(Notice::success("Graduated!"));
        self.advance(session, &mut notices);

        Ok(Outcome {
            transition: Transition::Graduated,
            notices,
        })
    }

    fn advance(&self, session: &mut QuizSession, notices: &mut Vec<Notice>) {
        session.advance();
        if session.pool().is_empty() && session.selection().mode == StudyMode::Review {
            notices.push(Notice::success("Review queue cleared!"));
        }
    }

    async fn record_incorrect(&self, question: &QuestionRecord, notices: &mut Vec<Notice>) {
        match self.store.add(ProgressTable::Incorrect, question).await {
            Ok(AddOutcome::Inserted) => tracing::debug!(key = %question.key, "added to incorrect"),
            Ok(AddOutcome::AlreadyPresent) => {}
            Err(e) => store_failure("save to", ProgressTable::Incorrect, &e, notices),
        }
    }

    /// Remove a question from a table. Returns `true` unless the store failed.
    async fn remove_from(
        &self,
        table: ProgressTable,
        question: &QuestionRecord,
        notices: &mut Vec<Notice>,
    ) -> bool {
        match self.store.remove(table, &question.identity()).await {
            Ok(_) => true,
            Err(e) => {
                store_failure("delete from", table, &e, notices);
                false
            }
        }
    }

    async fn list_or_empty(
        &self,
        table: ProgressTable,
        notices: &mut Vec<Notice>,
    ) -> Vec<QuestionRecord> {
        match self.store.list(table).await {
            Ok(rows) => rows,
            Err(e) => {
                store_failure("read", table, &e, notices);
                Vec::new()
            }
        }
    }
}

fn store_failure(
    action: &str,
    table: ProgressTable,
    err: &crate::error::StoreError,
    notices: &mut Vec<Notice>,
) {
    tracing::warn!("failed to {action} {table}: {err}");
    notices.push(Notice::error(format!("Could not {action} '{table}': {err}")));
}

/// Review sessions ignore the unit filter and mastery flag.
fn same_pool(a: &PoolSelection, b: &PoolSelection) -> bool {
    match (a.mode, b.mode) {
        (StudyMode::Review, StudyMode::Review) => true,
        _ => a == b,
    }
}
