//! Lookup error handling for command handlers.
//!
//! Every failure stops at the handler boundary: it is logged at the level its
//! category calls for and turned into the text the user sees.

use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Reply used whenever a spreadsheet read or write fails.
pub const UPSTREAM_APOLOGY: &str =
    "Sorry, the guild spreadsheets are unavailable right now. Please try again later.";

/// High-level category of a lookup failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Player, class, spell or summary absent from the sheets.
    NotFound,
    /// A required argument is missing or malformed.
    InvalidInput,
    /// Spreadsheet or price feed could not be reached.
    UpstreamUnavailable,
    /// Caller lacks the role a command requires.
    Unauthorized,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0} is not on the roster")]
    UnknownPlayer(String),

    #[error("No players found for {0}")]
    EmptyGroup(String),

    #[error("{player} is not listed on the {sheet} spell sheet")]
    PlayerNotFound { player: String, sheet: String },

    #[error("No spell matching \"{0}\" was found")]
    SpellNotFound(String),

    #[error("No raid summary found for {player} on {raid}")]
    SummaryNotFound { player: String, raid: String },

    #[error("{0} requires a privileged role")]
    Unauthorized(String),

    #[error("Spreadsheet unavailable: {0}")]
    Upstream(dkp_sheets::Error),
}

impl From<dkp_sheets::Error> for LookupError {
    fn from(err: dkp_sheets::Error) -> Self {
        match err {
            dkp_sheets::Error::InvalidColumn(n) => {
                LookupError::InvalidInput(format!("Invalid column number {}", n))
            }
            other => LookupError::Upstream(other),
        }
    }
}

impl LookupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::InvalidInput(_) => ErrorCategory::InvalidInput,
            LookupError::Upstream(_) => ErrorCategory::UpstreamUnavailable,
            LookupError::Unauthorized(_) => ErrorCategory::Unauthorized,
            LookupError::UnknownPlayer(_)
            | LookupError::EmptyGroup(_)
            | LookupError::PlayerNotFound { .. }
            | LookupError::SpellNotFound(_)
            | LookupError::SummaryNotFound { .. } => ErrorCategory::NotFound,
        }
    }

    /// Text shown in chat. Upstream details stay in the logs.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::UpstreamUnavailable => UPSTREAM_APOLOGY.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Log a lookup error at the level matching its category.
///
/// - Upstream failures → `error!`
/// - Privilege refusals → `warn!`
/// - Missing records → `info!`
/// - Bad input → `debug!`
pub fn log_error(context: &str, err: &LookupError) {
    match err.category() {
        ErrorCategory::UpstreamUnavailable => error!("{}: {}", context, err),
        ErrorCategory::Unauthorized => warn!("{}: {}", context, err),
        ErrorCategory::NotFound => info!("{}: {}", context, err),
        ErrorCategory::InvalidInput => debug!("{}: {}", context, err),
    }
}
