//! Answer grading policy.
//!
//! An answering-phase submission is accepted or rejected by, in order:
//! the AI verdict when it is `Correct` or `Incorrect`, otherwise the
//! normalized similarity against `accept_threshold`. Blank input is rejected
//! before the AI is consulted. The correction phase uses only similarity,
//! against the stricter `correction_threshold`.

use serde::{Deserialize, Serialize};

use crate::judge::{AiJudge, AiVerdict};
use crate::model::QuestionRecord;
use crate::similarity::similarity;

/// Thresholds used by the grader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingPolicy {
    /// Minimum similarity to accept an answer when the AI verdict is unavailable.
    #[serde(default = "default_accept_threshold")]
    pub accept_threshold: f64,
    /// Minimum similarity to leave the correction phase.
    #[serde(default = "default_correction_threshold")]
    pub correction_threshold: f64,
}

fn default_accept_threshold() -> f64 {
    0.95
}
fn default_correction_threshold() -> f64 {
    0.98
}

impl Default for GradingPolicy {
    fn default() -> Self {
        Self {
            accept_threshold: default_accept_threshold(),
            correction_threshold: default_correction_threshold(),
        }
    }
}

impl GradingPolicy {
    /// Combine a verdict and a similarity score.
    pub fn decide(&self, verdict: AiVerdict, score: f64) -> bool {
        match verdict {
            AiVerdict::Correct => true,
            AiVerdict::Incorrect => false,
            AiVerdict::Unavailable => score >= self.accept_threshold,
        }
    }

    /// Whether a correction-phase attempt matches the reference closely enough.
    pub fn correction_passes(&self, input: &str, reference: &str) -> bool {
        similarity(input, reference) >= self.correction_threshold
    }
}

/// Outcome of grading one answering-phase submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Grade {
    /// Blank input; the AI was not consulted.
    Blank,
    Graded {
        verdict: AiVerdict,
        score: f64,
        accepted: bool,
    },
}

impl Grade {
    pub fn accepted(&self) -> bool {
        matches!(self, Grade::Graded { accepted: true, .. })
    }
}

/// Grades answers using the policy and an optional AI judge.
pub struct Grader {
    policy: GradingPolicy,
    judge: Option<AiJudge>,
}

impl Grader {
    pub fn new(policy: GradingPolicy, judge: Option<AiJudge>) -> Self {
        Self { policy, judge }
    }

    /// A grader that never calls an AI.
    pub fn similarity_only(policy: GradingPolicy) -> Self {
        Self::new(policy, None)
    }

    pub fn policy(&self) -> &GradingPolicy {
        &self.policy
    }

    pub fn uses_ai(&self) -> bool {
        self.judge.is_some()
    }

    /// Grade an answering-phase submission.
    pub async fn grade(&self, question: &QuestionRecord, input: &str) -> Grade {
        if input.trim().is_empty() {
            return Grade::Blank;
        }

        let verdict = match &self.judge {
            Some(judge) => judge.judge(question, input).await,
            None => AiVerdict::Unavailable,
        };
        let score = similarity(input, &question.eng);
        let accepted = self.policy.decide(verdict, score);
        tracing::debug!(?verdict, score, accepted, "graded answer");

        Grade::Graded {
            verdict,
            score,
            accepted,
        }
    }

    /// Grade a correction-phase attempt.
    pub fn grade_correction(&self, question: &QuestionRecord, input: &str) -> bool {
        self.policy.correction_passes(input, &question.eng)
    }
}
