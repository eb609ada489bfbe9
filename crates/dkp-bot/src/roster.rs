//! Player resolution across the roster and ledger sheets.
//!
//! The two tabs share nothing but the player name. The roster has one row per
//! player with class, rank and level. The ledger holds raid attendance and
//! points grouped into class blocks whose class name is only written on the
//! first row of each block, so the class has to be carried forward while
//! scanning.

#[path = "roster_tests.rs"]
mod roster_tests;

use dkp_sheets::{cell, Row, SheetStore};
use dkp_types::{canonical_name, parse_points, ClassSet, Player, PlayerGroup};
use tracing::{debug, error, info};

use crate::config::{DkpSheetConfig, LedgerColumns, RosterColumns};
use crate::errors::LookupError;

/// Resolves players and class groups. Every call reads both tabs afresh.
pub struct RosterResolver<'a, S> {
    sheets: &'a S,
    config: &'a DkpSheetConfig,
}

impl<'a, S: SheetStore> RosterResolver<'a, S> {
    pub fn new(sheets: &'a S, config: &'a DkpSheetConfig) -> Self {
        Self { sheets, config }
    }

    /// Resolve a single player. Failures are logged and yield an empty
    /// `Player`, which callers treat as "not on the roster". Handlers use
    /// [`Self::try_resolve_player`] so an outage is not reported as a miss.
    #[cfg(test)]
    pub async fn resolve_player(&self, name: &str) -> Player {
        match self.try_resolve_player(name).await {
            Ok(player) => player,
            Err(e) => {
                error!("Player lookup for '{}' failed: {}", name, e);
                Player::default()
            }
        }
    }

    /// Resolve a single player, surfacing spreadsheet failures.
    ///
    /// A player on the roster but not the ledger keeps blank ledger fields and
    /// zero points. A player on neither comes back with an empty name.
    pub async fn try_resolve_player(&self, name: &str) -> Result<Player, LookupError> {
        let target = canonical_name(name);
        if target.is_empty() {
            return Err(LookupError::InvalidInput("A player name is required".to_string()));
        }
        let mut player = Player::default();

        let roster = self.read(&self.config.roster_sheet).await?;
        let cols = &self.config.roster;
        match roster.iter().find(|row| cell(row, cols.name).trim() == target) {
            Some(row) => player = roster_player(row, cols),
            None => info!("Player not found on roster: {}", target),
        }

        let ledger = self.read(&self.config.ledger_sheet).await?;
        let cols = &self.config.ledger;
        let found = ledger_entries(&ledger, cols.class)
            .find(|(_, row)| cell(row, cols.name).trim() == target);
        match found {
            Some((class, row)) => {
                debug!("Found {} in the {} block of the ledger", target, class);
                apply_ledger(&mut player, row, cols);
            }
            None => info!("Player not found on DKP ledger: {}", target),
        }

        Ok(player)
    }

    /// Resolve every player whose class falls under `keyword`, ranked by
    /// points. Failures are logged and yield an empty group.
    pub async fn resolve_group(&self, keyword: &str) -> PlayerGroup {
        match self.try_resolve_group(keyword).await {
            Ok(group) => group,
            Err(e) => {
                error!("Class lookup for '{}' failed: {}", keyword, e);
                PlayerGroup::new()
            }
        }
    }

    /// Resolve a class group, surfacing spreadsheet failures.
    pub async fn try_resolve_group(&self, keyword: &str) -> Result<PlayerGroup, LookupError> {
        let classes = ClassSet::expand(keyword);
        debug!("Finding players for classes: {:?}", classes);

        let roster = self.read(&self.config.roster_sheet).await?;
        let cols = &self.config.roster;
        let mut group: PlayerGroup = roster
            .iter()
            .filter(|row| !cell(row, cols.name).trim().is_empty())
            .filter(|row| classes.contains(cell(row, cols.class)))
            .map(|row| roster_player(row, cols))
            .collect();

        let ledger = self.read(&self.config.ledger_sheet).await?;
        let cols = &self.config.ledger;
        for (class, row) in ledger_entries(&ledger, cols.class) {
            if !classes.contains(&class) {
                continue;
            }
            let name = cell(row, cols.name);
            match group.find_mut(name) {
                Some(player) => apply_ledger(player, row, cols),
                None => debug!("Ledger row '{}' ({}) has no roster entry", name.trim(), class),
            }
        }

        Ok(group.ranked())
    }

    async fn read(&self, range: &str) -> Result<Vec<Row>, LookupError> {
        Ok(self
            .sheets
            .read_range(&self.config.spreadsheet_id, range)
            .await?)
    }
}

/// Pair each ledger row with the class block it belongs to. The class cell is
/// only set on a block's first row; blank cells inherit the last one seen.
pub(crate) fn ledger_entries(
    rows: &[Row],
    class_column: usize,
) -> impl Iterator<Item = (String, &Row)> + '_ {
    rows.iter().scan(String::new(), move |current, row| {
        let header = cell(row, class_column).trim();
        if !header.is_empty() {
            *current = header.to_lowercase();
        }
        Some((current.clone(), row))
    })
}

fn roster_player(row: &[String], cols: &RosterColumns) -> Player {
    Player {
        name: cell(row, cols.name).trim().to_string(),
        class: cell(row, cols.class).trim().to_lowercase(),
        rank: cell(row, cols.rank).trim().to_string(),
        level: cell(row, cols.level).trim().to_string(),
        ..Player::default()
    }
}

fn apply_ledger(player: &mut Player, row: &[String], cols: &LedgerColumns) {
    player.last_raid = cell(row, cols.last_raid).trim().to_string();
    player.attendance = cell(row, cols.attendance).trim().to_string();
    player.points = parse_points(cell(row, cols.points));
}
