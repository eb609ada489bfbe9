//! Command handlers
//!
//! Each handler returns the full reply text. Lookup failures are logged here
//! and rendered with [`LookupError::user_message`].

use dkp_sheets::SheetStore;
use dkp_types::{title_case, Player, PlayerGroup};
use tracing::{error, info};

use crate::dispatch::{Dispatcher, MessageContext};
use crate::errors::{log_error, ErrorCategory, LookupError};
use crate::prices::PriceFeed;
use crate::registry::{Action, CommandDescriptor};
use crate::roster::RosterResolver;
use crate::spells::{SpellCell, SpellGrid};
use crate::summary::raid_summary;

/// Reply when the price feed cannot be reached.
pub const PRICE_UNAVAILABLE: &str = "Error obtaining krono price, please try again later";

/// Reply when the rules tab is empty.
pub const NO_RULES: &str = "No rules have been posted yet";

impl<S: SheetStore + Sync, P: PriceFeed + Sync> Dispatcher<S, P> {
    /// Run a command whose gates already passed. `tokens[0]` is the trigger.
    pub(crate) async fn run(
        &self,
        command: &CommandDescriptor,
        tokens: &[String],
        caller: &MessageContext,
    ) -> String {
        let args = tokens.get(1..).unwrap_or_default();
        if args.len() < command.min_params {
            return command.usage();
        }

        let result = match command.action {
            Action::Dkp => self.player_points(&args[0], &args.join(" ")).await,
            Action::DkpClass => self.group_points(&args.join(" ")).await,
            Action::RaidSummary => {
                let raid = args[1..].join(" ");
                raid_summary(&self.sheets, &self.config.dkp, &args[0], &raid).await
            }
            Action::Help => Ok(self.help()),
            Action::Krono => Ok(self.krono().await),
            Action::Spell => self.spell(&args[0], &args[1..].join(" ")).await,
            Action::GiveSpell => {
                self.give_spell(&args[0], &args[1..].join(" "), caller)
                    .await
            }
            Action::Rules => self.rules().await,
            Action::Echo => Ok(format!("{:#?}\n{:?}", caller, tokens)),
        };

        match result {
            Ok(reply) => reply,
            Err(e) => {
                log_error(&command.trigger, &e);
                match e.category() {
                    ErrorCategory::InvalidInput => command.usage(),
                    _ => e.user_message(),
                }
            }
        }
    }

    fn roster(&self) -> RosterResolver<'_, S> {
        RosterResolver::new(&self.sheets, &self.config.dkp)
    }

    fn spell_grid(&self) -> SpellGrid<'_, S> {
        SpellGrid::new(&self.sheets, &self.config.spells)
    }

    /// A single player's points, falling back to a class listing when the
    /// name is not on the roster. Only the first argument names the player;
    /// the whole argument list is the class keyword (`shadow knight`).
    async fn player_points(&self, name: &str, keyword: &str) -> Result<String, LookupError> {
        let player = self.roster().try_resolve_player(name).await?;
        if player.is_known() {
            return Ok(points_line(&player));
        }

        // The sheets just answered, so an empty group here means no match.
        let group = self.roster().resolve_group(keyword).await;
        if group.is_empty() {
            return Err(LookupError::UnknownPlayer(name.trim().to_string()));
        }
        Ok(group_listing(&group))
    }

    async fn group_points(&self, keyword: &str) -> Result<String, LookupError> {
        let group = self.roster().try_resolve_group(keyword).await?;
        if group.is_empty() {
            return Err(LookupError::EmptyGroup(keyword.trim().to_string()));
        }
        Ok(group_listing(&group))
    }

    fn help(&self) -> String {
        self.registry
            .visible()
            .map(|command| format!("{}\n", command.usage()))
            .collect()
    }

    async fn krono(&self) -> String {
        match self.prices.current_price().await {
            Ok(price) => format!("The average price of krono is {} pp", price),
            Err(e) => {
                error!("Error getting krono price: {:#}", e);
                PRICE_UNAVAILABLE.to_string()
            }
        }
    }

    async fn spell(&self, name: &str, spell: &str) -> Result<String, LookupError> {
        let (player, found) = self.locate_spell(name, spell).await?;
        Ok(if found.has_spell {
            format!("{} has {}", player.name, spell)
        } else {
            format!("{} does not have {}", player.name, spell)
        })
    }

    async fn give_spell(
        &self,
        name: &str,
        spell: &str,
        caller: &MessageContext,
    ) -> Result<String, LookupError> {
        let player = self.known_player(name).await?;
        let found = self
            .spell_grid()
            .set_spell(&player.name, &title_case(&player.class), spell)
            .await?;
        info!(
            "{} has been given {} at {} by {} ({})",
            player.name,
            spell,
            found.range(),
            caller.author_name,
            caller.author_id
        );
        Ok(format!("{} has been given {}", player.name, spell))
    }

    async fn locate_spell(
        &self,
        name: &str,
        spell: &str,
    ) -> Result<(Player, SpellCell), LookupError> {
        let player = self.known_player(name).await?;
        let found = self
            .spell_grid()
            .find_cell(&player.name, &title_case(&player.class), spell)
            .await?;
        Ok((player, found))
    }

    /// Resolve a player that must be on the roster, since the spell sheet
    /// tab is picked by their class.
    async fn known_player(&self, name: &str) -> Result<Player, LookupError> {
        let player = self.roster().try_resolve_player(name).await?;
        if !player.is_known() {
            return Err(LookupError::UnknownPlayer(name.trim().to_string()));
        }
        Ok(player)
    }

    async fn rules(&self) -> Result<String, LookupError> {
        let rows = self
            .sheets
            .read_range(&self.config.spells.spreadsheet_id, &self.config.spells.rules_sheet)
            .await?;
        let lines: Vec<&str> = rows
            .iter()
            .flatten()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect();
        if lines.is_empty() {
            return Ok(NO_RULES.to_string());
        }
        Ok(lines.join("\n"))
    }
}

fn points_line(player: &Player) -> String {
    format!("{}({}):\t{}", player.name, player.rank, player.points)
}

fn group_listing(group: &PlayerGroup) -> String {
    group
        .iter()
        .map(|player| format!("{}\n", points_line(player)))
        .collect()
}
