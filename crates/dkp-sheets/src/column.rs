//! Column index to A1 letter notation

use crate::error::{Error, Result};

/// Convert a 1-based column index to its spreadsheet letters (1 → A, 27 → AA).
pub fn column_name(num: usize) -> Result<String> {
    if num < 1 {
        return Err(Error::InvalidColumn(num));
    }
    let mut letters = Vec::new();
    let mut n = num;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    Ok(letters.into_iter().rev().collect())
}
