//! Error types for dkp-sheets

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for spreadsheet operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Invalid column number {0}")]
    InvalidColumn(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "Sheets API returned 403: forbidden");
    }

    #[test]
    fn test_invalid_column_display() {
        assert_eq!(Error::InvalidColumn(0).to_string(), "Invalid column number 0");
    }

    #[test]
    fn test_config_error_display() {
        let err = Error::Config("missing token".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing token");
    }

    #[test]
    fn test_result_err() {
        let r: Result<()> = Err(Error::Url("nope".to_string()));
        assert!(r.is_err());
    }
}
