//! Quiz session state.
//!
//! A `QuizSession` is the explicit context every engine handler receives: the
//! live pool, the cursor into it, the current step, and the learner's last
//! wrong answer. It owns no I/O; `QuizEngine` performs store and AI calls and
//! then moves the session with the methods here.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{PoolSelection, QuestionRecord};

/// Where the current question is in its review lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Answering,
    /// The learner must copy the reference answer before moving on.
    Correction,
    /// Answered correctly; the next submit advances.
    Completed,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Answering => write!(f, "answering"),
            Step::Correction => write!(f, "correction"),
            Step::Completed => write!(f, "completed"),
        }
    }
}

/// Running counts for the quit summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTally {
    /// Answering-phase submissions.
    pub answered: u32,
    pub accepted: u32,
    /// Blank answering-phase submissions.
    pub missed: u32,
    /// Corrections completed.
    pub corrected: u32,
    pub graduated: u32,
}

/// State of one drill session.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    selection: PoolSelection,
    pool: Vec<QuestionRecord>,
    index: usize,
    step: Step,
    last_wrong_input: Option<String>,
    /// Drop the current question from the pool when advancing.
    retire_current: bool,
    pub tally: SessionTally,
}

impl QuizSession {
    /// Start a session on the first question of `pool`.
    pub fn new(selection: PoolSelection, pool: Vec<QuestionRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            selection,
            pool,
            index: 0,
            step: Step::Answering,
            last_wrong_input: None,
            retire_current: false,
            tally: SessionTally::default(),
        }
    }

    pub fn selection(&self) -> &PoolSelection {
        &self.selection
    }

    pub fn pool(&self) -> &[QuestionRecord] {
        &self.pool
    }

    /// Zero-based position of the current question in the pool.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.pool.get(self.index)
    }

    /// The rejected answer shown during correction. `None` for a blank answer.
    pub fn last_wrong_input(&self) -> Option<&str> {
        self.last_wrong_input.as_deref()
    }

    /// Replace the pool and selection, returning to the first question.
    pub fn reset(&mut self, selection: PoolSelection, pool: Vec<QuestionRecord>) {
        self.selection = selection;
        self.pool = pool;
        self.index = 0;
        self.load_current();
    }

    /// Replace the selection while keeping the pool and position.
    pub fn set_selection(&mut self, selection: PoolSelection) {
        self.selection = selection;
    }

    pub(crate) fn enter_correction(&mut self, wrong_input: Option<String>) {
        self.step = Step::Correction;
        self.last_wrong_input = wrong_input;
    }

    pub(crate) fn complete(&mut self) {
        self.step = Step::Completed;
    }

    /// Mark the current question to leave the pool at the next advance.
    pub(crate) fn retire_current(&mut self) {
        self.retire_current = true;
    }

    /// Move to the next question, wrapping around the pool.
    pub(crate) fn advance(&mut self) {
        if self.retire_current && self.index < self.pool.len() {
            self.pool.remove(self.index);
        } else {
            self.index += 1;
        }
        if self.pool.is_empty() {
            self.index = 0;
        } else {
            self.index %= self.pool.len();
        }
        self.load_current();
    }

    fn load_current(&mut self) {
        self.step = Step::Answering;
        self.last_wrong_input = None;
        self.retire_current = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> Vec<QuestionRecord> {
        (0..n)
            .map(|i| QuestionRecord::new("A", "B", "C", &format!("sentence {i}"), "문장"))
            .collect()
    }

    #[test]
    fn starts_answering_on_first_question() {
        let s = QuizSession::new(PoolSelection::default(), pool(3));
        assert_eq!(s.step(), Step::Answering);
        assert_eq!(s.index(), 0);
        assert_eq!(s.current().unwrap().eng, "sentence 0");
    }

    #[test]
    fn advance_wraps_modulo_pool_length() {
        let mut s = QuizSession::new(PoolSelection::default(), pool(3));
        for expected in [1, 2, 0, 1] {
            s.advance();
            assert_eq!(s.index(), expected);
        }
    }

    #[test]
    fn advance_resets_step_and_wrong_input() {
        let mut s = QuizSession::new(PoolSelection::default(), pool(2));
        s.enter_correction(Some("wrong".into()));
        assert_eq!(s.last_wrong_input(), Some("wrong"));
        s.advance();
        assert_eq!(s.step(), Step::Answering);
        assert_eq!(s.last_wrong_input(), None);
    }

    #[test]
    fn retired_question_leaves_the_pool() {
        let mut s = QuizSession::new(PoolSelection::default(), pool(3));
        s.advance();
        s.retire_current();
        s.advance();
        assert_eq!(s.pool().len(), 2);
        assert_eq!(s.current().unwrap().eng, "sentence 2");

        s.retire_current();
        s.advance();
        assert_eq!(s.pool().len(), 1);
        assert_eq!(s.current().unwrap().eng, "sentence 0");

        s.retire_current();
        s.advance();
        assert!(s.pool().is_empty());
        assert!(s.current().is_none());
    }

    #[test]
    fn empty_pool_has_no_current() {
        let mut s = QuizSession::new(PoolSelection::default(), vec![]);
        assert!(s.current().is_none());
        s.advance();
        assert_eq!(s.index(), 0);
    }

    #[test]
    fn reset_returns_to_first_question() {
        let mut s = QuizSession::new(PoolSelection::default(), pool(3));
        s.advance();
        s.complete();
        s.reset(PoolSelection::default(), pool(2));
        assert_eq!(s.index(), 0);
        assert_eq!(s.step(), Step::Answering);
        assert_eq!(s.pool().len(), 2);
    }
}
