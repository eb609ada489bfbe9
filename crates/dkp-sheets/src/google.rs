//! Google Sheets v4 values API client

use reqwest::{Client, Response, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::SheetsConfig;
use crate::error::{Error, Result};
use crate::store::{Row, SheetStore};

/// Sheets client authenticated with a bearer token
#[derive(Clone)]
pub struct GoogleSheets {
    client: Client,
    api_base: Url,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl GoogleSheets {
    /// Create a client from configuration
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| Error::Url(format!("{}: {}", config.api_base, e)))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::Url(config.api_base.clone()));
        }
        if config.access_token.is_empty() {
            return Err(Error::Config("sheets access token is empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            api_base,
            access_token: config.access_token.clone(),
        })
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Url(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(["spreadsheets", spreadsheet_id, "values", range]);
        Ok(url)
    }
}

impl SheetStore for GoogleSheets {
    async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>> {
        let url = self.values_url(spreadsheet_id, range)?;
        debug!("Reading range '{}' of spreadsheet {}", range, spreadsheet_id);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let body: ValueRange = check_status(response).await?.json().await?;

        Ok(body
            .values
            .iter()
            .map(|row| row.iter().map(cell_text).collect())
            .collect())
    }

    async fn write_cell(&self, spreadsheet_id: &str, cell: &str, value: &str) -> Result<()> {
        let url = self.values_url(spreadsheet_id, cell)?;
        debug!("Writing '{}' to {} of spreadsheet {}", value, cell, spreadsheet_id);

        let body = json!({
            "range": cell,
            "majorDimension": "ROWS",
            "values": [[value]],
        });
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}

/// Render a loosely typed cell the way the sheet displays it.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}
