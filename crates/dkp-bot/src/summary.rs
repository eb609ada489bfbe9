//! Per-raid DKP summaries.
//!
//! The summary tab lists one row per award or purchase. A player's rows for
//! one raid are contiguous and the row right after the last of them carries
//! the raid total in its points column.

use dkp_sheets::{cell, Row, SheetStore};
use dkp_types::canonical_name;

use crate::config::{DkpSheetConfig, SummaryColumns};
use crate::errors::LookupError;

/// Render the summary for `player` on the raid whose date cell contains `raid`.
pub async fn raid_summary<S: SheetStore>(
    sheets: &S,
    config: &DkpSheetConfig,
    player: &str,
    raid: &str,
) -> Result<String, LookupError> {
    let player = canonical_name(player);
    let raid = raid.trim();
    if player.is_empty() || raid.is_empty() {
        return Err(LookupError::InvalidInput(
            "A player and a raid date are required".to_string(),
        ));
    }

    let rows = sheets
        .read_range(&config.spreadsheet_id, &config.summary_sheet)
        .await?;
    render(&rows, &config.summary, &player, raid).ok_or_else(|| LookupError::SummaryNotFound {
        player,
        raid: raid.to_string(),
    })
}

fn render(rows: &[Row], cols: &SummaryColumns, player: &str, raid: &str) -> Option<String> {
    let matches = |row: &Row| {
        cell(row, cols.player).trim() == player && cell(row, cols.date).contains(raid)
    };

    let start = rows.iter().position(&matches)?;
    let mut out = format!("{} on {}\n", player, raid);
    for row in &rows[start..] {
        if !matches(row) {
            out.push_str(&format!("\nTotal :: {}\n", cell(row, cols.points)));
            break;
        }
        out.push_str(&format!(
            "{} :: {}\n",
            cell(row, cols.description),
            cell(row, cols.points)
        ));
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use dkp_sheets::MemSheets;

    fn config() -> DkpSheetConfig {
        DkpSheetConfig {
            spreadsheet_id: "dkp".to_string(),
            ..DkpSheetConfig::default()
        }
    }

    fn sheets() -> MemSheets {
        MemSheets::new().with_sheet(
            "dkp",
            "Summary",
            &[
                &["Date", "Player", "Description", "DKP"],
                &["2024-05-01 Plane of Fear", "Gruk", "On time", "5"],
                &["2024-05-01 Plane of Fear", "Gruk", "Dread", "10"],
                &["2024-05-01 Plane of Fear", "Gruk", "Bought Cloak", "-30"],
                &["", "", "", "-15"],
                &["2024-05-01 Plane of Fear", "Light", "On time", "5"],
                &["", "", "", "5"],
            ],
        )
    }

    #[tokio::test]
    async fn test_summary_lists_rows_and_total() {
        let response = raid_summary(&sheets(), &config(), "gruk", "2024-05-01")
            .await
            .unwrap();
        assert_eq!(
            response,
            "Gruk on 2024-05-01\nOn time :: 5\nDread :: 10\nBought Cloak :: -30\n\nTotal :: -15\n"
        );
    }

    #[tokio::test]
    async fn test_summary_matches_partial_date() {
        let response = raid_summary(&sheets(), &config(), "Light", "Fear")
            .await
            .unwrap();
        assert_eq!(response, "Light on Fear\nOn time :: 5\n\nTotal :: 5\n");
    }

    #[tokio::test]
    async fn test_summary_without_total_row() {
        let sheets = MemSheets::new().with_sheet(
            "dkp",
            "Summary",
            &[&["2024-06-01", "Gruk", "On time", "5"]],
        );
        let response = raid_summary(&sheets, &config(), "Gruk", "2024-06")
            .await
            .unwrap();
        assert_eq!(response, "Gruk on 2024-06\nOn time :: 5\n");
    }

    #[tokio::test]
    async fn test_summary_not_found() {
        let err = raid_summary(&sheets(), &config(), "Gruk", "2023")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "No raid summary found for Gruk on 2023");
    }

    #[tokio::test]
    async fn test_summary_offline_is_upstream() {
        let err = raid_summary(&sheets().offline(), &config(), "Gruk", "2024")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn test_summary_requires_both_arguments() {
        let err = raid_summary(&sheets(), &config(), "Gruk", " ")
            .await
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }
}
