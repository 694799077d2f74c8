//! `SheetStore` implementation against the spreadsheet provider's REST API
//! (Google-Sheets-style `values` endpoints, JSON over HTTPS).

use crate::core::mapping;
use crate::domain::model::{AppendOutcome, HeaderLayout, OutputRow};
use crate::domain::ports::SheetStore;
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

/// Wire shape of a `values` read: a block of rows for the requested range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct AppendResponse {
    updates: Option<AppendUpdates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppendUpdates {
    updated_rows: Option<usize>,
    updated_range: Option<String>,
}

pub struct SheetsApiStore {
    client: Client,
    endpoint: String,
    worksheet: String,
    token: Option<String>,
}

impl SheetsApiStore {
    /// `endpoint` is the spreadsheet's base URL up to and including its id,
    /// e.g. `https://sheets.googleapis.com/v4/spreadsheets/<id>`.
    pub fn new(endpoint: impl Into<String>, worksheet: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            worksheet: worksheet.into(),
            token,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<serde_json::Value>>> {
        let url = format!("{}/values/{}!{}", self.endpoint, self.worksheet, range);
        tracing::debug!("Reading sheet range: {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        if !response.status().is_success() {
            return Err(RelayError::Sheet {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }
}

/// 0-based column index to its A1-notation letter ("A", "Z", "AA", ...).
fn column_letter(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_else(|_| "A".to_string())
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetStore for SheetsApiStore {
    async fn header_row(&self) -> Result<HeaderLayout> {
        let values = self.get_values("1:1").await?;
        let headers = values
            .into_iter()
            .next()
            .unwrap_or_default()
            .iter()
            .map(cell_text)
            .collect();
        Ok(headers)
    }

    async fn transaction_ids(&self) -> Result<Vec<String>> {
        // The id column's position is whatever the live header row says.
        let headers = self.header_row().await?;
        let Some(index) = headers
            .iter()
            .position(|h| mapping::map_header(h) == Some("transaction_id"))
        else {
            tracing::warn!("Worksheet has no transaction-id column, no ids in use");
            return Ok(Vec::new());
        };

        let letter = column_letter(index);
        let values = self.get_values(&format!("{letter}2:{letter}")).await?;
        Ok(values
            .iter()
            .filter_map(|row| row.first())
            .map(cell_text)
            .collect())
    }

    async fn append_rows(&self, rows: &[OutputRow]) -> Result<AppendOutcome> {
        let url = format!(
            "{}/values/{}:append?valueInputOption=USER_ENTERED",
            self.endpoint, self.worksheet
        );
        tracing::debug!("Appending {} rows via {}", rows.len(), url);

        let body = serde_json::json!({ "values": rows });
        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RelayError::Sheet {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let parsed: AppendResponse = response.json().await?;
        let updates = parsed.updates.unwrap_or(AppendUpdates {
            updated_rows: None,
            updated_range: None,
        });
        Ok(AppendOutcome {
            appended_rows: updates.updated_rows.unwrap_or(rows.len()),
            updated_range: updates.updated_range,
        })
    }
}
