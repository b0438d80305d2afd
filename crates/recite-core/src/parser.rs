//! Quiz bank parser.
//!
//! A bank is a UTF-8, line-oriented text file:
//!
//! ```text
//! [Tenses > Past > Regular verbs]
//! #Add -ed to most verbs.
//! I walked to school.|나는 학교에 걸어갔다.
//! ```
//!
//! Section headers set the unit for the lines that follow, `#` lines add to
//! that unit's learning note, and `english|korean` lines are drill entries.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::BankError;
use crate::model::{unit_key, QuestionRecord, RecordIdentity, ALL_LABEL, UNSORTED_LABEL};

/// A parsed quiz bank.
#[derive(Debug, Clone, Default)]
pub struct QuizBank {
    /// Entries in file order.
    pub questions: Vec<QuestionRecord>,
    /// Learning notes keyed by unit key.
    pub descriptions: BTreeMap<String, String>,
    /// Lines that were skipped.
    pub warnings: Vec<ParseWarning>,
}

impl QuizBank {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Learning note for a unit key, if any.
    pub fn description(&self, key: &str) -> Option<&str> {
        self.descriptions.get(key).map(String::as_str)
    }
}

/// A problem found while parsing or validating a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based line number, if the warning is tied to a line.
    pub line: Option<usize>,
    pub message: String,
}

/// Parse a bank file.
pub fn load_bank(path: &Path) -> Result<QuizBank, BankError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BankError::NotFound(path.to_path_buf())
        } else {
            BankError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let bank = parse_bank_str(&content);
    tracing::debug!(
        path = %path.display(),
        questions = bank.questions.len(),
        notes = bank.descriptions.len(),
        "loaded quiz bank"
    );
    Ok(bank)
}

/// Load a bank, degrading to an empty bank when the file cannot be read.
///
/// The error is returned alongside so the caller can surface it.
pub fn load_bank_or_empty(path: &Path) -> (QuizBank, Option<BankError>) {
    match load_bank(path) {
        Ok(bank) => (bank, None),
        Err(e) => {
            tracing::error!("{e}");
            (QuizBank::default(), Some(e))
        }
    }
}

struct Context {
    major: String,
    middle: String,
    minor: String,
    key: String,
}

impl Context {
    fn new(major: &str, middle: &str, minor: &str) -> Self {
        Self {
            major: major.to_string(),
            middle: middle.to_string(),
            minor: minor.to_string(),
            key: unit_key(major, middle, minor),
        }
    }
}

/// Parse bank text.
pub fn parse_bank_str(content: &str) -> QuizBank {
    let mut bank = QuizBank::default();
    let mut ctx = Context::new(UNSORTED_LABEL, UNSORTED_LABEL, ALL_LABEL);

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let mut parts = inner.split('>').map(str::trim);
            let major = parts.next().unwrap_or_default();
            let middle = parts.next().unwrap_or(ALL_LABEL);
            let minor = parts.next().unwrap_or(ALL_LABEL);
            if parts.next().is_some() {
                bank.warnings.push(ParseWarning {
                    line: Some(line_no),
                    message: "header has more than three levels; extra levels ignored".into(),
                });
            }
            ctx = Context::new(major, middle, minor);
        } else if let Some(note) = line.strip_prefix('#') {
            let note = note.trim();
            bank.descriptions
                .entry(ctx.key.clone())
                .and_modify(|existing| {
                    existing.push_str("\n\n");
                    existing.push_str(note);
                })
                .or_insert_with(|| note.to_string());
        } else if line.contains('|') {
            let mut fields = line.split('|');
            match (fields.next(), fields.next(), fields.next()) {
                (Some(eng), Some(kor), None) => bank.questions.push(QuestionRecord {
                    major: ctx.major.clone(),
                    middle: ctx.middle.clone(),
                    minor: ctx.minor.clone(),
                    key: ctx.key.clone(),
                    eng: eng.trim().to_string(),
                    kor: kor.trim().to_string(),
                }),
                _ => bank.warnings.push(ParseWarning {
                    line: Some(line_no),
                    message: "entry has more than one '|'; skipped".into(),
                }),
            }
        } else {
            bank.warnings.push(ParseWarning {
                line: Some(line_no),
                message: format!("unrecognized line skipped: {line}"),
            });
        }
    }

    bank
}

/// Check a parsed bank for common authoring mistakes.
///
/// Returns the parser's own warnings followed by the validation findings.
pub fn validate_bank(bank: &QuizBank) -> Vec<ParseWarning> {
    let mut warnings = bank.warnings.clone();

    let mut seen: HashSet<RecordIdentity> = HashSet::new();
    for q in &bank.questions {
        if !seen.insert(q.identity()) {
            warnings.push(ParseWarning {
                line: None,
                message: format!("duplicate entry in {}: {}", q.key, q.eng),
            });
        }
        if q.eng.is_empty() || q.kor.is_empty() {
            warnings.push(ParseWarning {
                line: None,
                message: format!("entry in {} has an empty side: '{}|{}'", q.key, q.eng, q.kor),
            });
        }
    }

    let keys_with_entries: HashSet<&str> = bank.questions.iter().map(|q| q.key.as_str()).collect();
    for key in bank.descriptions.keys() {
        if !keys_with_entries.contains(key.as_str()) {
            warnings.push(ParseWarning {
                line: None,
                message: format!("unit {key} has a learning note but no entries"),
            });
        }
    }

    warnings
}
