//! Configuration management for dkp-bot

#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use dkp_sheets::SheetsConfig;
use serde::{Deserialize, Serialize};
use std::fs;

/// Complete bot configuration. Loaded once at startup and never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordBotConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub dkp: DkpSheetConfig,
    #[serde(default)]
    pub spells: SpellSheetConfig,
    #[serde(default)]
    pub price_feed: PriceFeedConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

/// Discord bot specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordBotConfig {
    /// Bot token from the Discord developer portal
    pub bot_token: String,
    /// Guild whose roles decide who may run privileged commands
    pub guild_id: u64,
    /// Role names allowed to run privileged commands (exact match)
    pub privileged_roles: Vec<String>,
    /// Reply sent when an unprivileged user tries a privileged command
    pub no_privilege_response: String,
    /// Longest message Discord accepts, in characters
    pub max_message_length: usize,
}

impl Default for DiscordBotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            guild_id: 0,
            privileged_roles: Vec::new(),
            no_privilege_response: "You do not have permission to use that command.".to_string(),
            max_message_length: 2000,
        }
    }
}

/// Location and column layout of the DKP spreadsheet tabs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DkpSheetConfig {
    pub spreadsheet_id: String,
    pub roster_sheet: String,
    pub ledger_sheet: String,
    pub summary_sheet: String,
    pub roster: RosterColumns,
    pub ledger: LedgerColumns,
    pub summary: SummaryColumns,
}

impl Default for DkpSheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            roster_sheet: "Roster".to_string(),
            ledger_sheet: "DKP".to_string(),
            summary_sheet: "Summary".to_string(),
            roster: RosterColumns::default(),
            ledger: LedgerColumns::default(),
            summary: SummaryColumns::default(),
        }
    }
}

/// Zero-based roster columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub name: usize,
    pub class: usize,
    pub level: usize,
    pub rank: usize,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            name: 0,
            class: 1,
            level: 2,
            rank: 3,
        }
    }
}

/// Zero-based ledger columns. `class` is only filled on the first row of
/// each class block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerColumns {
    pub class: usize,
    pub name: usize,
    pub last_raid: usize,
    pub attendance: usize,
    pub points: usize,
}

impl Default for LedgerColumns {
    fn default() -> Self {
        Self {
            class: 0,
            name: 1,
            last_raid: 2,
            attendance: 3,
            points: 4,
        }
    }
}

/// Zero-based raid summary columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryColumns {
    pub date: usize,
    pub player: usize,
    pub description: usize,
    pub points: usize,
}

impl Default for SummaryColumns {
    fn default() -> Self {
        Self {
            date: 0,
            player: 1,
            description: 2,
            points: 3,
        }
    }
}

/// How a requested spell name is compared with the grid's spell column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpellMatch {
    /// Case-insensitive substring. Ambiguous when one spell name contains another.
    #[default]
    Contains,
    /// Case-insensitive equality after trimming
    Exact,
}

/// Spell grid spreadsheet: one tab per class, players across, spells down
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellSheetConfig {
    pub spreadsheet_id: String,
    /// Tab holding the guild rules, read by the rules command
    pub rules_sheet: String,
    /// Zero-based row holding player names
    pub header_row: usize,
    /// Zero-based column holding spell names
    pub spell_column: usize,
    /// Zero-based index of the first spell row
    pub first_data_row: usize,
    pub match_mode: SpellMatch,
}

impl Default for SpellSheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            rules_sheet: "Rules".to_string(),
            header_row: 1,
            spell_column: 0,
            first_data_row: 3,
            match_mode: SpellMatch::Contains,
        }
    }
}

/// Auction price feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceFeedConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            url: "https://api.araduneauctions.net/GetKronoPrice".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Per-command overrides. Unset fields keep the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOverride {
    pub trigger: Option<String>,
    pub help: Option<String>,
    pub dm_only: Option<bool>,
    pub privileged: Option<bool>,
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    pub dkp: CommandOverride,
    pub dkp_class: CommandOverride,
    pub raid_summary: CommandOverride,
    pub help: CommandOverride,
    pub krono: CommandOverride,
    pub spell: CommandOverride,
    pub give_spell: CommandOverride,
    pub rules: CommandOverride,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Settings that load fine but will make some commands useless
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.discord.privileged_roles.is_empty() {
            warnings.push("no privileged_roles configured; privileged commands always refuse".to_string());
        }
        if self.discord.guild_id == 0 {
            warnings.push("guild_id is not set; role lookups will fail".to_string());
        }
        if self.dkp.spreadsheet_id.is_empty() {
            warnings.push("dkp.spreadsheet_id is empty".to_string());
        }
        if self.spells.spreadsheet_id.is_empty() {
            warnings.push("spells.spreadsheet_id is empty".to_string());
        }
        if self.spells.header_row >= self.spells.first_data_row {
            warnings.push(format!(
                "spells.header_row ({}) is not above spells.first_data_row ({})",
                self.spells.header_row, self.spells.first_data_row
            ));
        }
        warnings
    }
}
