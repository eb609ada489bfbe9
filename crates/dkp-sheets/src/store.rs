use std::future::Future;

use crate::error::Result;

/// One sheet row as display strings. Rows may be shorter than the header.
pub type Row = Vec<String>;

/// Read/write access to a spreadsheet.
/// Implemented by `GoogleSheets` (real API) and `MemSheets` (in-memory, tests).
pub trait SheetStore {
    /// Read every row of `range` (a sheet name or A1 range).
    fn read_range(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Write a single value to `cell` (e.g. `Cleric!C5`) as if typed by a user.
    fn write_cell(
        &self,
        spreadsheet_id: &str,
        cell: &str,
        value: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Cell `col` of `row`, or `""` when the row is too short.
pub fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}
