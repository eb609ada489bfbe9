//! Configuration types for the Sheets client

use serde::{Deserialize, Serialize};

/// Sheets API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Base URL of the values API, without a trailing `/spreadsheets`
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// OAuth bearer token. Acquiring and refreshing it happens outside the bot.
    #[serde(default)]
    pub access_token: String,
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            access_token: String::new(),
        }
    }
}

impl SheetsConfig {
    pub fn new(api_base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            access_token: access_token.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_google() {
        let cfg = SheetsConfig::default();
        assert_eq!(cfg.api_base, "https://sheets.googleapis.com/v4");
        assert!(cfg.access_token.is_empty());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let cfg: SheetsConfig = serde_json::from_str(r#"{"access_token":"tok"}"#).unwrap();
        assert_eq!(cfg.api_base, "https://sheets.googleapis.com/v4");
        assert_eq!(cfg.access_token, "tok");
    }
}
