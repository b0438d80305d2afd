//! recite-sheets: progress store backed by a Google Sheets spreadsheet.
//!
//! Each [`ProgressTable`] is a worksheet of the same name. Reads use the
//! values API; appends use `values:append`; deletes resolve the worksheet's
//! numeric id and issue a `deleteDimension` batch update.

pub mod rows;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use recite_core::error::StoreError;
use recite_core::model::{ProgressTable, QuestionRecord, RecordIdentity};
use recite_core::traits::{AddOutcome, ProgressStore};

use crate::rows::{parse_rows, record_cells, SheetRow};

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Google Sheets v4 progress store.
pub struct SheetsStore {
    spreadsheet_id: String,
    access_token: String,
    base_url: String,
    client: reqwest::Client,
}

impl SheetsStore {
    pub fn new(spreadsheet_id: &str, access_token: &str, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            access_token: access_token.to_string(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client,
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/v4/spreadsheets/{}", self.base_url, self.spreadsheet_id)
    }

    fn range_url(&self, table: ProgressTable) -> String {
        format!("{}/values/{}!A:F", self.spreadsheet_url(), table)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.access_token))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Network(format!("request timed out after {DEFAULT_TIMEOUT_SECS}s"))
                } else {
                    StoreError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(StoreError::Api { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn rows(&self, table: ProgressTable) -> Result<Vec<SheetRow>, StoreError> {
        let range: ValueRange = self.send(self.client.get(self.range_url(table))).await?;
        parse_rows(table, &range.values)
    }

    async fn sheet_id(&self, table: ProgressTable) -> Result<i64, StoreError> {
        let url = format!(
            "{}?fields=sheets.properties(sheetId,title)",
            self.spreadsheet_url()
        );
        let spreadsheet: Spreadsheet = self.send(self.client.get(url)).await?;
        spreadsheet
            .sheets
            .into_iter()
            .map(|s| s.properties)
            .find(|p| p.title == table.as_str())
            .map(|p| p.sheet_id)
            .ok_or_else(|| StoreError::Schema {
                table,
                message: "no worksheet with this name".into(),
            })
    }
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    title: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[async_trait]
impl ProgressStore for SheetsStore {
    fn name(&self) -> &str {
        "google-sheets"
    }

    #[instrument(skip(self), fields(spreadsheet = %self.spreadsheet_id))]
    async fn list(&self, table: ProgressTable) -> Result<Vec<QuestionRecord>, StoreError> {
        let rows = self.rows(table).await?;
        tracing::debug!(count = rows.len(), "listed progress rows");
        Ok(rows.into_iter().map(|r| r.record).collect())
    }

    #[instrument(skip(self, record), fields(spreadsheet = %self.spreadsheet_id, key = %record.key))]
    async fn add(
        &self,
        table: ProgressTable,
        record: &QuestionRecord,
    ) -> Result<AddOutcome, StoreError> {
        let identity = record.identity();
        let existing = self.rows(table).await?;
        if existing.iter().any(|r| r.record.identity() == identity) {
            tracing::debug!("row already present");
            return Ok(AddOutcome::AlreadyPresent);
        }

        let url = format!("{}:append?valueInputOption=RAW", self.range_url(table));
        let body = json!({ "values": [record_cells(record)] });
        let _: Value = self.send(self.client.post(url).json(&body)).await?;
        tracing::debug!("row appended");
        Ok(AddOutcome::Inserted)
    }

    #[instrument(skip(self), fields(spreadsheet = %self.spreadsheet_id))]
    async fn remove(
        &self,
        table: ProgressTable,
        identity: &RecordIdentity,
    ) -> Result<bool, StoreError> {
        let rows = self.rows(table).await?;
        let Some(row) = rows.iter().find(|r| r.record.identity() == *identity) else {
            return Ok(false);
        };

        let sheet_id = self.sheet_id(table).await?;
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row.row_index,
                        "endIndex": row.row_index + 1
                    }
                }
            }]
        });
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let _: Value = self.send(self.client.post(url).json(&body)).await?;
        tracing::debug!(row = row.row_index, "row deleted");
        Ok(true)
    }
}
