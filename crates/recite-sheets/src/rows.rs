//! Mapping between worksheet value ranges and question records.
//!
//! A progress worksheet starts with a header row naming the columns
//! `major, middle, minor, eng, kor, key` in any order. Rows are matched by
//! header name, so extra columns are ignored.

use serde_json::Value;

use recite_core::error::StoreError;
use recite_core::model::{ProgressTable, QuestionRecord};

/// Column order used when appending rows.
pub const COLUMNS: [&str; 6] = ["major", "middle", "minor", "eng", "kor", "key"];

/// A data row with its zero-based position in the worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Worksheet row index; the header is row 0.
    pub row_index: usize,
    pub record: QuestionRecord,
}

struct Header {
    major: Option<usize>,
    middle: Option<usize>,
    minor: Option<usize>,
    eng: usize,
    kor: Option<usize>,
    key: usize,
}

impl Header {
    fn parse(table: ProgressTable, cells: &[Value]) -> Result<Self, StoreError> {
        let names: Vec<String> = cells.iter().map(|c| cell_text(c).trim().to_lowercase()).collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let required = |name: &str| {
            find(name).ok_or_else(|| StoreError::Schema {
                table,
                message: format!("header row has no '{name}' column"),
            })
        };

        Ok(Self {
            major: find("major"),
            middle: find("middle"),
            minor: find("minor"),
            eng: required("eng")?,
            kor: find("kor"),
            key: required("key")?,
        })
    }
}

/// Render a cell as text. Numbers and booleans are stringified; empty cells
/// and nulls are empty strings.
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode a `values` range (header first) into data rows.
///
/// Rows with every cell blank are skipped but keep their position in the
/// numbering, so `row_index` always addresses the worksheet row.
pub fn parse_rows(table: ProgressTable, values: &[Vec<Value>]) -> Result<Vec<SheetRow>, StoreError> {
    let Some((header, data)) = values.split_first() else {
        return Ok(Vec::new());
    };
    let header = Header::parse(table, header)?;

    let rows = data
        .iter()
        .enumerate()
        .filter(|(_, cells)| cells.iter().any(|c| !cell_text(c).trim().is_empty()))
        .map(|(i, cells)| {
            let get = |col: Option<usize>| {
                col.and_then(|c| cells.get(c))
                    .map(cell_text)
                    .unwrap_or_default()
            };
            SheetRow {
                row_index: i + 1,
                record: QuestionRecord {
                    major: get(header.major),
                    middle: get(header.middle),
                    minor: get(header.minor),
                    key: get(Some(header.key)),
                    eng: get(Some(header.eng)),
                    kor: get(header.kor),
                },
            }
        })
        .collect();
    Ok(rows)
}

/// Cells for appending a record, in [`COLUMNS`] order.
pub fn record_cells(record: &QuestionRecord) -> Vec<Value> {
    [
        &record.major,
        &record.middle,
        &record.minor,
        &record.eng,
        &record.kor,
        &record.key,
    ]
    .into_iter()
    .map(|s| Value::String(s.clone()))
    .collect()
}
