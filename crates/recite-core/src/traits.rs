//! Core trait definitions for LLM providers and progress stores.
//!
//! These async traits are implemented by the `recite-providers` and
//! `recite-sheets` crates respectively.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{ProgressTable, QuestionRecord, RecordIdentity};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that answer a single text prompt.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Run one completion.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<CompletionResponse>;

    /// List the models this provider is known to serve.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request for a single completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g. "gemini-2.5-flash").
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional system instruction.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The reply text.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting for one completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
}

// ---------------------------------------------------------------------------
// Progress store trait
// ---------------------------------------------------------------------------

/// Result of adding a record to a progress table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Inserted,
    /// A row with the same `(key, eng)` identity already exists.
    AlreadyPresent,
}

/// External store holding the incorrect and mastered sets.
///
/// Implementations must keep `(key, eng)` unique per table: `add` reports
/// [`AddOutcome::AlreadyPresent`] instead of writing a second row.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Human-readable store name (e.g. "google-sheets").
    fn name(&self) -> &str;

    /// All records in a table, in stored order.
    async fn list(&self, table: ProgressTable) -> Result<Vec<QuestionRecord>, StoreError>;

    /// Append a record unless its identity is already present.
    async fn add(
        &self,
        table: ProgressTable,
        record: &QuestionRecord,
    ) -> Result<AddOutcome, StoreError>;

    /// Delete the first row with this identity. Returns `false` if none matched.
    async fn remove(
        &self,
        table: ProgressTable,
        identity: &RecordIdentity,
    ) -> Result<bool, StoreError>;
}
