//! Spreadsheet access for the DKP bot
//!
//! Rows come back as ragged vectors of display strings; callers index them
//! through [`cell`] so short rows read as blank instead of panicking.

pub mod column;
pub mod config;
pub mod error;
pub mod google;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use column::column_name;
pub use config::SheetsConfig;
pub use error::{Error, Result};
pub use google::GoogleSheets;
pub use store::{cell, Row, SheetStore};

#[cfg(any(test, feature = "test-support"))]
pub use mock::MemSheets;
