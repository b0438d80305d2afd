//! AI grading judge.
//!
//! Asks an LLM whether a learner's English translation is acceptable and
//! turns its one-token reply into an [`AiVerdict`]. Any failure along the way
//! collapses to [`AiVerdict::Unavailable`] so the caller can fall back to the
//! similarity threshold.

use std::sync::Arc;

use tracing::instrument;

use crate::error::ProviderError;
use crate::model::QuestionRecord;
use crate::traits::{CompletionRequest, LlmProvider};

/// Default model for grading.
pub const DEFAULT_JUDGE_MODEL: &str = "gemini-2.5-flash";

/// Room for the verdict token plus stray quoting. Providers that think before
/// answering add their thinking budget on top.
const MAX_VERDICT_TOKENS: u32 = 16;

const SYSTEM_PROMPT: &str = "You are a strict English grammar teacher grading translations from Korean. Answer with a single character: O or X.";

/// Tri-state verdict from the AI judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiVerdict {
    Correct,
    Incorrect,
    /// The call failed or the reply was not a verdict.
    Unavailable,
}

/// Wraps a provider with the grading prompt.
pub struct AiJudge {
    provider: Arc<dyn LlmProvider>,
    model: String,
    temperature: f64,
}

impl AiJudge {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask the model to grade one answer. Never fails.
    #[instrument(skip_all, fields(provider = %self.provider.name(), model = %self.model))]
    pub async fn judge(&self, question: &QuestionRecord, answer: &str) -> AiVerdict {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: grading_prompt(&question.kor, &question.eng, answer),
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: MAX_VERDICT_TOKENS,
            temperature: self.temperature,
        };

        match self.provider.complete(&request).await {
            Ok(response) => {
                let verdict = parse_verdict(&response.content);
                if verdict == AiVerdict::Unavailable {
                    tracing::warn!(reply = %response.content, "AI reply is not a verdict");
                } else {
                    tracing::debug!(?verdict, latency_ms = response.latency_ms, "AI verdict");
                }
                verdict
            }
            Err(e) => {
                match e.downcast_ref::<ProviderError>() {
                    Some(pe) if pe.is_permanent() => {
                        tracing::warn!("AI grading unavailable, check provider settings: {pe}")
                    }
                    _ => tracing::warn!("AI grading call failed: {e:#}"),
                }
                AiVerdict::Unavailable
            }
        }
    }
}

/// Build the grading prompt.
pub fn grading_prompt(korean: &str, reference: &str, answer: &str) -> String {
    format!(
        "Check if the student's English composition is grammatically correct and matches the meaning of the Korean source.\n\
         \n\
         Korean source: \"{korean}\"\n\
         Model answer: \"{reference}\"\n\
         Student answer: \"{answer}\"\n\
         \n\
         Grading rules:\n\
         1. Ignore case and punctuation: treat 'The' and 'the' as the same and ignore missing periods.\n\
         2. Strict grammar: reject verb tense errors.\n\
         3. Strict spelling: reject typos.\n\
         4. Accept valid synonyms only if the grammar is perfect.\n\
         \n\
         Answer only \"O\" (correct) or \"X\" (incorrect)."
    )
}

/// Interpret a model reply. Only a bare `O` or `X` counts; surrounding
/// whitespace, quotes, `*` and `.` are ignored.
pub fn parse_verdict(reply: &str) -> AiVerdict {
    let token = reply
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '*' | '.' | '`'));
    match token.to_uppercase().as_str() {
        "O" => AiVerdict::Correct,
        "X" => AiVerdict::Incorrect,
        _ => AiVerdict::Unavailable,
    }
}
