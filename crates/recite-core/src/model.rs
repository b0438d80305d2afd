//! Core data model types for recite.
//!
//! These are the fundamental types the rest of the system uses to represent
//! drill sentences, their identities in the progress store, and the pool
//! selection a session is built from.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label meaning "every unit at this level". Also the default for omitted
/// middle/minor levels in a section header.
pub const ALL_LABEL: &str = "전체";

/// Major/middle label for entries that appear before any section header.
pub const UNSORTED_LABEL: &str = "기타";

/// A single drill sentence loaded from the quiz bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Top-level unit.
    pub major: String,
    /// Second-level unit.
    pub middle: String,
    /// Third-level unit.
    pub minor: String,
    /// `"{major}-{middle}-{minor}"`, shared by every record in the same unit.
    pub key: String,
    /// Reference English answer.
    pub eng: String,
    /// Korean sentence shown to the learner.
    pub kor: String,
}

impl QuestionRecord {
    pub fn new(major: &str, middle: &str, minor: &str, eng: &str, kor: &str) -> Self {
        Self {
            major: major.to_string(),
            middle: middle.to_string(),
            minor: minor.to_string(),
            key: unit_key(major, middle, minor),
            eng: eng.to_string(),
            kor: kor.to_string(),
        }
    }

    /// The `(key, eng)` pair used for dedup and removal.
    pub fn identity(&self) -> RecordIdentity {
        RecordIdentity::new(&self.key, &self.eng)
    }

    /// `"Major > Middle > Minor"`, used in captions.
    pub fn unit_path(&self) -> String {
        format!("{} > {} > {}", self.major, self.middle, self.minor)
    }
}

/// Build the unit key for a major/middle/minor triple.
pub fn unit_key(major: &str, middle: &str, minor: &str) -> String {
    format!("{major}-{middle}-{minor}")
}

/// Identity of a record in the progress store.
///
/// Both halves are trimmed on construction, so values padded with incidental
/// whitespace (common in hand-edited sheets) compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordIdentity {
    pub key: String,
    pub eng: String,
}

impl RecordIdentity {
    pub fn new(key: &str, eng: &str) -> Self {
        Self {
            key: key.trim().to_string(),
            eng: eng.trim().to_string(),
        }
    }

    /// True if either half is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.key.is_empty() || self.eng.is_empty()
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.key, self.eng)
    }
}

/// The two progress tables kept in the external store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTable {
    /// Review queue of sentences answered wrong.
    Incorrect,
    /// Sentences the learner has graduated.
    Mastered,
}

impl ProgressTable {
    pub const ALL: [ProgressTable; 2] = [ProgressTable::Incorrect, ProgressTable::Mastered];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressTable::Incorrect => "incorrect",
            ProgressTable::Mastered => "mastered",
        }
    }
}

impl fmt::Display for ProgressTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incorrect" => Ok(ProgressTable::Incorrect),
            "mastered" => Ok(ProgressTable::Mastered),
            other => Err(format!("unknown progress table: {other}")),
        }
    }
}

/// Which pool a session drills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    /// The bank, filtered by unit and mastery.
    #[default]
    Normal,
    /// The incorrect set.
    Review,
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyMode::Normal => write!(f, "normal"),
            StudyMode::Review => write!(f, "review"),
        }
    }
}

/// One level of the unit filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse a user-supplied level, treating blanks, `all`, and `전체` as `All`.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == ALL_LABEL || s.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(s.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

/// Major/middle/minor unit filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnitFilter {
    pub major: Selection,
    pub middle: Selection,
    pub minor: Selection,
}

impl UnitFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, record: &QuestionRecord) -> bool {
        self.major.matches(&record.major)
            && self.middle.matches(&record.middle)
            && self.minor.matches(&record.minor)
    }
}

impl FromStr for UnitFilter {
    type Err = String;

    /// Parse `"Major > Middle > Minor"`; missing levels mean "all".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('>').collect();
        if parts.len() > 3 {
            return Err(format!("unit path has more than three levels: {s}"));
        }
        let level = |i: usize| parts.get(i).map(|p| Selection::parse(p)).unwrap_or_default();
        Ok(Self {
            major: level(0),
            middle: level(1),
            minor: level(2),
        })
    }
}

impl fmt::Display for UnitFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} > {}", self.major, self.middle, self.minor)
    }
}

/// Everything that determines a session's pool. A change to any field resets
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolSelection {
    pub mode: StudyMode,
    pub units: UnitFilter,
    /// Keep graduated sentences in the normal-mode pool.
    pub include_mastered: bool,
}
