use std::collections::HashMap;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::models::HEADER;

#[cfg(test)]
pub mod memory;

/// Errors surfaced by the spreadsheet API layer
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("spreadsheet API returned {status} during {operation}")]
    Api { status: u16, operation: &'static str },
    #[error("cell ({row}, {col}) is out of range")]
    OutOfRange { row: u32, col: u32 },
}

/// The backing store seam: a two-dimensional remote table addressed by
/// 1-indexed (row, column) coordinates. Row 1 is the header row.
pub trait Worksheet {
    /// All rows as raw cell strings, in store order
    async fn rows(&self) -> Result<Vec<Vec<String>>>;

    /// Append one row after the last row
    async fn append_row(&self, values: &[String]) -> Result<()>;

    /// Overwrite a single cell, leaving every other cell untouched
    async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()>;
}

/// Read all data rows keyed by header label, the store's
/// read-all-as-records view. Rows shorter than the header are padded with
/// empty cells. An empty or header-only sheet yields no records.
pub async fn records<W: Worksheet>(ws: &W) -> Result<Vec<HashMap<String, String>>> {
    let mut rows = ws.rows().await?.into_iter();
    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    Ok(rows
        .map(|row| {
            header
                .iter()
                .cloned()
                .zip(row.into_iter().chain(std::iter::repeat(String::new())))
                .collect()
        })
        .collect())
}

/// Seed the header row if the worksheet is completely empty. At most one
/// write, once per process start; a no-op otherwise.
pub async fn ensure_header<W: Worksheet>(ws: &W) -> Result<()> {
    if ws.rows().await?.is_empty() {
        let header: Vec<String> = HEADER.iter().map(|label| label.to_string()).collect();
        ws.append_row(&header).await?;
        info!("seeded worksheet header row");
    }

    Ok(())
}

/// Google Sheets v4 client. One long-lived handle, created at startup and
/// passed into the UI layer; authentication is the opaque bearer token from
/// the environment.
pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    worksheet: String,
    token: String,
}

impl SheetsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.sheets_base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            worksheet: config.worksheet.clone(),
            token: config.sheets_token.clone(),
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.base_url, self.spreadsheet_id, range
        )
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// The API may hand back bare numbers or booleans; the tracker treats every
/// cell as text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }
}

impl Worksheet for SheetsClient {
    async fn rows(&self) -> Result<Vec<Vec<String>>> {
        let response = self
            .http
            .get(self.values_url(&self.worksheet))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetError::Api {
                status: response.status().as_u16(),
                operation: "read rows",
            }
            .into());
        }

        let body: ValueRange = response.json().await?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    async fn append_row(&self, values: &[String]) -> Result<()> {
        let url = format!("{}:append", self.values_url(&self.worksheet));
        let response = self
            .http
            .post(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&json!({ "values": [values] }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetError::Api {
                status: response.status().as_u16(),
                operation: "append row",
            }
            .into());
        }

        info!(first_cell = values.first().map(String::as_str), "appended worksheet row");
        Ok(())
    }

    async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()> {
        let range = format!("{}!{}", self.worksheet, a1_reference(row, col));
        let response = self
            .http
            .put(self.values_url(&range))
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SheetError::Api {
                status: response.status().as_u16(),
                operation: "update cell",
            }
            .into());
        }

        info!(row, col, value, "updated worksheet cell");
        Ok(())
    }
}

/// 1-indexed (row, col) coordinates to A1 notation, e.g. (5, 3) -> "C5"
pub fn a1_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row)
}

/// Spreadsheet column number to letters: 1 -> A, 26 -> Z, 27 -> AA
fn column_letter(mut col: u32) -> String {
    let mut letters = String::new();
    while col > 0 {
        let rem = ((col - 1) % 26) as u8;
        letters.insert(0, (b'A' + rem) as char);
        col = (col - 1) / 26;
    }
    letters
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::memory::MemorySheet;
    use super::*;

    #[test]
    fn column_letters_roll_over_past_z() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(3), "C");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
        assert_eq!(column_letter(52), "AZ");
    }

    #[test]
    fn a1_reference_places_column_before_row() {
        assert_eq!(a1_reference(5, 3), "C5");
        assert_eq!(a1_reference(2, 1), "A2");
    }

    #[tokio::test]
    async fn ensure_header_seeds_empty_sheet_once() {
        let sheet = MemorySheet::new();

        ensure_header(&sheet).await.unwrap();
        ensure_header(&sheet).await.unwrap();

        let expected: Vec<String> = HEADER.iter().map(|label| label.to_string()).collect();
        assert_eq!(sheet.snapshot(), vec![expected]);
    }

    #[tokio::test]
    async fn ensure_header_leaves_populated_sheet_alone() {
        let sheet = MemorySheet::from_rows(vec![vec!["Other".to_string()]]);

        ensure_header(&sheet).await.unwrap();

        assert_eq!(sheet.snapshot(), vec![vec!["Other".to_string()]]);
    }

    #[tokio::test]
    async fn records_zip_rows_with_header_and_pad_short_rows() {
        let sheet = MemorySheet::from_rows(vec![
            vec!["Name".to_string(), "Status".to_string()],
            vec!["Launch".to_string()],
        ]);

        let records = records(&sheet).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["Name"], "Launch");
        assert_eq!(records[0]["Status"], "");
    }

    #[tokio::test]
    async fn records_are_empty_without_a_header() {
        let sheet = MemorySheet::new();
        assert!(records(&sheet).await.unwrap().is_empty());
    }
}
