use std::sync::Mutex;

use anyhow::Result;

use super::{SheetError, Worksheet};

/// In-memory worksheet for tests, honoring the same contract as the remote
/// store, including 1-indexed cell addressing.
pub struct MemorySheet {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Current sheet contents, for asserting on write effects
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

impl Worksheet for MemorySheet {
    async fn rows(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.snapshot())
    }

    async fn append_row(&self, values: &[String]) -> Result<()> {
        self.rows.lock().unwrap().push(values.to_vec());
        Ok(())
    }

    async fn update_cell(&self, row: u32, col: u32, value: &str) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let cells = rows
            .get_mut(row as usize - 1)
            .ok_or(SheetError::OutOfRange { row, col })?;

        if cells.len() < col as usize {
            cells.resize(col as usize, String::new());
        }
        cells[col as usize - 1] = value.to_string();

        Ok(())
    }
}
