//! Spell grid lookups and updates.
//!
//! The spell spreadsheet has one tab per class. A header row lists the players
//! across, the spell column lists spells down, and each cell is a TRUE/FALSE
//! checkbox.

use dkp_sheets::{cell, column_name, SheetStore};
use tracing::debug;

use crate::config::{SpellMatch, SpellSheetConfig};
use crate::errors::LookupError;

/// Location and state of one player/spell checkbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellCell {
    pub sheet: String,
    /// A1 address such as `C5`
    pub address: String,
    pub has_spell: bool,
}

impl SpellCell {
    /// Range addressing this cell, e.g. `Cleric!C5`.
    pub fn range(&self) -> String {
        format!("{}!{}", self.sheet, self.address)
    }
}

impl SpellMatch {
    /// Whether a spell-name cell matches the requested spell. Case-insensitive.
    pub fn matches(self, cell: &str, wanted: &str) -> bool {
        let cell = cell.trim().to_lowercase();
        let wanted = wanted.trim().to_lowercase();
        match self {
            SpellMatch::Contains => cell.contains(&wanted),
            SpellMatch::Exact => cell == wanted,
        }
    }
}

pub struct SpellGrid<'a, S> {
    sheets: &'a S,
    config: &'a SpellSheetConfig,
}

impl<'a, S: SheetStore> SpellGrid<'a, S> {
    pub fn new(sheets: &'a S, config: &'a SpellSheetConfig) -> Self {
        Self { sheets, config }
    }

    /// Locate the checkbox for `player` and `spell` on the `sheet` tab.
    pub async fn find_cell(
        &self,
        player: &str,
        sheet: &str,
        spell: &str,
    ) -> Result<SpellCell, LookupError> {
        let (player, sheet, spell) = (player.trim(), sheet.trim(), spell.trim());
        if player.is_empty() || sheet.is_empty() || spell.is_empty() {
            return Err(LookupError::InvalidInput(
                "A player, class sheet and spell are all required".to_string(),
            ));
        }

        let rows = self
            .sheets
            .read_range(&self.config.spreadsheet_id, sheet)
            .await?;

        let header = rows
            .get(self.config.header_row)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let player_column = header
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.config.spell_column)
            .find(|(_, name)| name.trim() == player)
            .map(|(i, _)| i)
            .ok_or_else(|| LookupError::PlayerNotFound {
                player: player.to_string(),
                sheet: sheet.to_string(),
            })?;

        let (row_index, row) = rows
            .iter()
            .enumerate()
            .skip(self.config.first_data_row)
            .find(|(_, row)| {
                self.config
                    .match_mode
                    .matches(cell(row, self.config.spell_column), spell)
            })
            .ok_or_else(|| LookupError::SpellNotFound(spell.to_string()))?;

        let address = format!("{}{}", column_name(player_column + 1)?, row_index + 1);
        let has_spell = cell(row, player_column).trim().eq_ignore_ascii_case("true");
        debug!(
            "Spell '{}' for {} is at {}!{} ({})",
            cell(row, self.config.spell_column).trim(),
            player,
            sheet,
            address,
            has_spell
        );

        Ok(SpellCell {
            sheet: sheet.to_string(),
            address,
            has_spell,
        })
    }

    /// Tick the checkbox for `player` and `spell`. Returns the cell as it was
    /// before the write.
    pub async fn set_spell(
        &self,
        player: &str,
        sheet: &str,
        spell: &str,
    ) -> Result<SpellCell, LookupError> {
        let found = self.find_cell(player, sheet, spell).await?;
        self.sheets
            .write_cell(&self.config.spreadsheet_id, &found.range(), "TRUE")
            .await?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use dkp_sheets::MemSheets;

    fn config(match_mode: SpellMatch) -> SpellSheetConfig {
        SpellSheetConfig {
            spreadsheet_id: "spells".to_string(),
            match_mode,
            ..SpellSheetConfig::default()
        }
    }

    fn cleric_sheet() -> MemSheets {
        MemSheets::new().with_sheet(
            "spells",
            "Cleric",
            &[
                &["Cleric spells"],
                &["Spell", "Mystic", "Healbot"],
                &["", "", ""],
                &["Complete Heal", "TRUE", "FALSE"],
                &["Greater Heal", "false", "True"],
                &["Heal", "FALSE", "TRUE"],
            ],
        )
    }

    #[tokio::test]
    async fn test_find_cell_reports_state_and_address() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let grid = SpellGrid::new(&sheets, &config);

        let found = grid.find_cell("Mystic", "Cleric", "complete heal").await.unwrap();
        assert_eq!(
            found,
            SpellCell {
                sheet: "Cleric".to_string(),
                address: "B4".to_string(),
                has_spell: true,
            }
        );
        assert_eq!(found.range(), "Cleric!B4");

        let found = grid.find_cell("Healbot", "Cleric", "Greater").await.unwrap();
        assert_eq!(found.address, "C5");
        assert!(found.has_spell);
    }

    #[tokio::test]
    async fn test_contains_mode_takes_first_substring_match() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let found = SpellGrid::new(&sheets, &config)
            .find_cell("Healbot", "Cleric", "heal")
            .await
            .unwrap();
        assert_eq!(found.address, "C4");
        assert!(!found.has_spell);
    }

    #[tokio::test]
    async fn test_exact_mode_requires_full_name() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Exact);
        let grid = SpellGrid::new(&sheets, &config);

        let found = grid.find_cell("Healbot", "Cleric", "HEAL").await.unwrap();
        assert_eq!(found.address, "C6");
        assert!(found.has_spell);

        let err = grid.find_cell("Healbot", "Cleric", "Greater").await.unwrap_err();
        assert!(matches!(err, LookupError::SpellNotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_player_is_not_found() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let err = SpellGrid::new(&sheets, &config)
            .find_cell("Gruk", "Cleric", "Heal")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "Gruk is not listed on the Cleric spell sheet");
    }

    #[tokio::test]
    async fn test_spell_column_header_is_not_a_player() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let err = SpellGrid::new(&sheets, &config)
            .find_cell("Spell", "Cleric", "Heal")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::PlayerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_sheet_is_player_not_found() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let err = SpellGrid::new(&sheets, &config)
            .find_cell("Mystic", "Bard", "Heal")
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::PlayerNotFound { .. }));
    }

    #[tokio::test]
    async fn test_blank_arguments_are_invalid() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let grid = SpellGrid::new(&sheets, &config);
        let cases = [
            ("", "Cleric", "Heal"),
            ("Mystic", " ", "Heal"),
            ("Mystic", "Cleric", ""),
        ];
        for (player, sheet, spell) in cases {
            let err = grid.find_cell(player, sheet, spell).await.unwrap_err();
            assert_eq!(err.category(), ErrorCategory::InvalidInput);
        }
        assert!(sheets.reads().is_empty());
    }

    #[tokio::test]
    async fn test_set_spell_writes_true() {
        let sheets = cleric_sheet();
        let config = config(SpellMatch::Contains);
        let before = SpellGrid::new(&sheets, &config)
            .set_spell("Mystic", "Cleric", "Greater Heal")
            .await
            .unwrap();
        assert!(!before.has_spell);
        assert_eq!(
            sheets.writes(),
            vec![(
                "spells".to_string(),
                "Cleric!B5".to_string(),
                "TRUE".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_set_spell_offline_is_upstream() {
        let sheets = cleric_sheet().offline();
        let config = config(SpellMatch::Contains);
        let err = SpellGrid::new(&sheets, &config)
            .set_spell("Mystic", "Cleric", "Heal")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UpstreamUnavailable);
        assert!(sheets.writes().is_empty());
    }

    #[test]
    fn test_match_modes() {
        assert!(SpellMatch::Contains.matches(" Complete Heal ", "heal"));
        assert!(!SpellMatch::Exact.matches(" Complete Heal ", "heal"));
        assert!(SpellMatch::Exact.matches(" Complete Heal ", "COMPLETE HEAL"));
    }
}
