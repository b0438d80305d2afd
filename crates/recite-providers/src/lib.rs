//! recite-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Google Gemini and loads the
//! `recite.toml` configuration that selects the grading provider.

pub mod config;
pub mod gemini;

pub use config::{create_provider, load_config, ProviderConfig, ReciteConfig};
pub use recite_core::error::ProviderError;
