//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use recite_core::grading::GradingPolicy;
use recite_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    pub fn api_key(&self) -> &str {
        match self {
            ProviderConfig::Gemini { api_key, .. } => api_key,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// `[grading]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingSettings {
    /// Consult the AI judge before falling back to similarity.
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
    #[serde(flatten)]
    pub policy: GradingPolicy,
}

fn default_use_ai() -> bool {
    true
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            use_ai: default_use_ai(),
            policy: GradingPolicy::default(),
        }
    }
}

/// `[sheets]` table: where progress is kept.
#[derive(Clone, Serialize, Deserialize)]
pub struct SheetsSettings {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub access_token: String,
    /// Override for the Sheets API root, mainly for tests.
    #[serde(default)]
    pub base_url: Option<String>,
}

impl std::fmt::Debug for SheetsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsSettings")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Top-level recite configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReciteConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for AI grading.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model used for AI grading.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Grading temperature (0.0 for stable verdicts).
    #[serde(default)]
    pub temperature: f64,
    /// Quiz bank file.
    #[serde(default = "default_bank_path")]
    pub bank_path: PathBuf,
    #[serde(default)]
    pub grading: GradingSettings,
    #[serde(default)]
    pub sheets: Option<SheetsSettings>,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    recite_core::judge::DEFAULT_JUDGE_MODEL.to_string()
}
fn default_bank_path() -> PathBuf {
    PathBuf::from("quiz_data.txt")
}

impl Default for ReciteConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: 0.0,
            bank_path: default_bank_path(),
            grading: GradingSettings::default(),
            sheets: None,
        }
    }
}

impl ReciteConfig {
    /// Sheets settings with a non-empty spreadsheet id and token.
    pub fn require_sheets(&self) -> Result<&SheetsSettings> {
        let sheets = self.sheets.as_ref().context(
            "no [sheets] section configured; add spreadsheet_id and access_token to recite.toml",
        )?;
        if sheets.spreadsheet_id.trim().is_empty() {
            anyhow::bail!("sheets.spreadsheet_id is empty");
        }
        if sheets.access_token.trim().is_empty() {
            anyhow::bail!("sheets.access_token is empty; set it or RECITE_SHEETS_TOKEN");
        }
        Ok(sheets)
    }

    /// The configured default provider, with a usable key.
    pub fn require_default_provider(&self) -> Result<&ProviderConfig> {
        let provider = self.providers.get(&self.default_provider).with_context(|| {
            format!(
                "provider '{}' not found in config. Available: {:?}",
                self.default_provider,
                self.providers.keys().collect::<Vec<_>>()
            )
        })?;
        if provider.api_key().trim().is_empty() {
            anyhow::bail!("provider '{}' has an empty api_key", self.default_provider);
        }
        Ok(provider)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again, and an unterminated `${` is kept
/// as written.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + 2 + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `recite.toml` in the current directory
/// 2. `~/.config/recite/config.toml`
///
/// Environment variable overrides: `RECITE_GEMINI_KEY`, `RECITE_SHEETS_TOKEN`.
pub fn load_config() -> Result<ReciteConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ReciteConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("recite.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ReciteConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse a config document and resolve `${VAR}` references.
pub fn parse_config(content: &str) -> Result<ReciteConfig> {
    let mut config: ReciteConfig = toml::from_str(content)?;
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    if let Some(sheets) = config.sheets.as_mut() {
        sheets.spreadsheet_id = resolve_env_vars(&sheets.spreadsheet_id);
        sheets.access_token = resolve_env_vars(&sheets.access_token);
        sheets.base_url = sheets.base_url.as_deref().map(resolve_env_vars);
    }
    Ok(config)
}

fn apply_env_overrides(config: &mut ReciteConfig) {
    if let Ok(key) = std::env::var("RECITE_GEMINI_KEY") {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        let ProviderConfig::Gemini { api_key, .. } = entry;
        *api_key = key;
    }

    if let Ok(token) = std::env::var("RECITE_SHEETS_TOKEN") {
        if let Some(sheets) = config.sheets.as_mut() {
            sheets.access_token = token;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("recite"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    tracing::debug!(provider = name, ?config, "creating provider");
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())))
        }
    }
}
