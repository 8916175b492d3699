//! Google Sheets REST (v4) backend

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AccessToken, PendingUpdate, SheetSource};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// One worksheet tab of a Google spreadsheet
#[derive(Debug, Clone)]
pub struct GoogleSheet {
    http: reqwest::Client,
    token: AccessToken,
    spreadsheet_id: String,
    worksheet: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateRequest<'a> {
    value_input_option: &'static str,
    data: Vec<RangeUpdate<'a>>,
}

#[derive(Debug, Serialize)]
struct RangeUpdate<'a> {
    range: String,
    values: [[&'a str; 1]; 1],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchUpdateResponse {
    #[serde(default)]
    total_updated_cells: u64,
}

impl GoogleSheet {
    pub fn new(
        http: reqwest::Client,
        token: AccessToken,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token,
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
            base_url: SHEETS_API_BASE.to_string(),
        }
    }

    /// Range naming only the worksheet, optionally narrowed by an A1 suffix
    fn range(&self, a1: Option<&str>) -> String {
        let tab = format!("'{}'", self.worksheet.replace('\'', "''"));
        match a1 {
            Some(a1) => format!("{}!{}", tab, a1),
            None => tab,
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.base_url,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    fn batch_update_url(&self) -> String {
        format!("{}/{}/values:batchUpdate", self.base_url, self.spreadsheet_id)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(range);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token.as_str())
            .send()
            .await
            .with_context(|| format!("Failed to read range {}", range))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Reading range {} failed ({}): {}", range, status, body);
        }

        let body: ValueRange = response
            .json()
            .await
            .with_context(|| format!("Failed to decode values for range {}", range))?;

        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

/// Cells normally arrive as strings; anything else is rendered as JSON text
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetSource for GoogleSheet {
    fn describe(&self) -> String {
        format!("spreadsheet {} / {}", self.spreadsheet_id, self.worksheet)
    }

    async fn header_row(&self) -> Result<Vec<String>> {
        let rows = self.get_values(&self.range(Some("1:1"))).await?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    async fn all_rows(&self) -> Result<Vec<Vec<String>>> {
        self.get_values(&self.range(None)).await
    }

    async fn batch_update(&self, updates: &[PendingUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let request = BatchUpdateRequest {
            value_input_option: "RAW",
            data: updates
                .iter()
                .map(|u| RangeUpdate {
                    range: self.range(Some(u.cell.to_a1().as_str())),
                    values: [[u.value.as_str()]],
                })
                .collect(),
        };

        let response = self
            .http
            .post(self.batch_update_url())
            .bearer_auth(self.token.as_str())
            .json(&request)
            .send()
            .await
            .context("Batch update request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Batch update rejected ({}): {}", status, body);
        }

        let summary: BatchUpdateResponse = response
            .json()
            .await
            .context("Failed to decode batch update response")?;
        log::debug!("Batch update wrote {} cells", summary.total_updated_cells);

        Ok(())
    }
}
