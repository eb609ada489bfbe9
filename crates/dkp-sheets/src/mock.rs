//! In-memory sheet store for unit testing without the Sheets API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::store::{Row, SheetStore};

/// Captured write: (spreadsheet id, cell, value)
pub type CapturedWrite = (String, String, String);

#[derive(Default)]
struct State {
    sheets: HashMap<(String, String), Vec<Row>>,
    writes: Vec<CapturedWrite>,
    reads: Vec<(String, String)>,
    offline: bool,
}

/// In-memory store keyed by (spreadsheet id, range). Unknown ranges read as
/// empty, like an empty sheet. Use in tests instead of `GoogleSheets`.
///
/// # Example
/// ```rust,ignore
/// let sheets = MemSheets::new().with_sheet("dkp", "Roster", &[&["Gruk", "Warrior"]]);
/// let rows = sheets.read_range("dkp", "Roster").await.unwrap();
/// ```
#[derive(Clone, Default)]
pub struct MemSheets {
    state: Arc<Mutex<State>>,
}

impl MemSheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a range with rows.
    pub fn with_sheet(self, spreadsheet_id: &str, range: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        self.state
            .lock()
            .unwrap()
            .sheets
            .insert((spreadsheet_id.to_string(), range.to_string()), rows);
        self
    }

    /// Make every subsequent read and write fail as if the API were unreachable.
    pub fn offline(self) -> Self {
        self.state.lock().unwrap().offline = true;
        self
    }

    /// Snapshot of all writes in call order.
    pub fn writes(&self) -> Vec<CapturedWrite> {
        self.state.lock().unwrap().writes.clone()
    }

    /// Snapshot of all (spreadsheet id, range) reads in call order.
    pub fn reads(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().reads.clone()
    }
}

fn unavailable() -> Error {
    Error::Api {
        status: 503,
        body: "sheet store offline".to_string(),
    }
}

impl SheetStore for MemSheets {
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>> {
        let mut state = self.state.lock().unwrap();
        state
            .reads
            .push((spreadsheet_id.to_string(), range.to_string()));
        if state.offline {
            return Err(unavailable());
        }
        Ok(state
            .sheets
            .get(&(spreadsheet_id.to_string(), range.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn write_cell(&self, spreadsheet_id: &str, cell: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.offline {
            return Err(unavailable());
        }
        state.writes.push((
            spreadsheet_id.to_string(),
            cell.to_string(),
            value.to_string(),
        ));
        Ok(())
    }
}
