//! Command dispatch
//!
//! Turns the tokens of one chat message into a response string. An empty
//! response means "stay silent". Gates run in order: sentinel, registry
//! lookup, DM-only, privilege.

#[path = "dispatch_tests.rs"]
mod dispatch_tests;

use std::future::Future;

use dkp_sheets::SheetStore;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::{log_error, LookupError};
use crate::prices::PriceFeed;
use crate::registry::{CommandRegistry, COMMAND_SENTINEL};

/// Who sent a message, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContext {
    pub author_id: u64,
    pub author_name: String,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub is_dm: bool,
}

/// Role names a user holds in a guild.
pub trait RoleDirectory {
    fn role_names(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> impl Future<Output = anyhow::Result<Vec<String>>> + Send;
}

/// Split message text into whitespace-separated tokens. No quoting.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Shared, read-only command context: registry, configuration and clients.
pub struct Dispatcher<S, P> {
    pub(crate) registry: CommandRegistry,
    pub(crate) config: Config,
    pub(crate) sheets: S,
    pub(crate) prices: P,
}

impl<S: SheetStore + Sync, P: PriceFeed + Sync> Dispatcher<S, P> {
    pub fn new(registry: CommandRegistry, config: Config, sheets: S, prices: P) -> Self {
        Self {
            registry,
            config,
            sheets,
            prices,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Produce the reply to one message. Never fails; every error has already
    /// been logged and turned into text by the time this returns.
    pub async fn dispatch<R: RoleDirectory + Sync>(
        &self,
        tokens: &[String],
        caller: &MessageContext,
        roles: &R,
    ) -> String {
        let Some(first) = tokens.first() else {
            return String::new();
        };
        if !first.starts_with(COMMAND_SENTINEL) {
            return String::new();
        }
        let Some(command) = self.registry.find(first) else {
            debug!("No command registered for {}", first);
            return String::new();
        };

        if command.dm_only && !caller.is_dm {
            info!(
                "Ignoring {} from {}: only answered in direct messages",
                command.trigger, caller.author_name
            );
            return String::new();
        }

        if command.privileged && !self.is_privileged(caller, roles).await {
            log_error(
                &format!("Refused {}", caller.author_name),
                &LookupError::Unauthorized(command.trigger.clone()),
            );
            return self.config.discord.no_privilege_response.clone();
        }

        info!(
            "{} ran {} (channel {}, guild {:?})",
            caller.author_name, command.trigger, caller.channel_id, caller.guild_id
        );
        self.run(command, tokens, caller).await
    }

    async fn is_privileged<R: RoleDirectory + Sync>(
        &self,
        caller: &MessageContext,
        roles: &R,
    ) -> bool {
        let allowed = &self.config.discord.privileged_roles;
        if allowed.is_empty() {
            return false;
        }
        match roles
            .role_names(self.config.discord.guild_id, caller.author_id)
            .await
        {
            Ok(held) => held.iter().any(|role| allowed.contains(role)),
            Err(e) => {
                warn!(
                    "Failed to look up roles for {} ({}): {:#}",
                    caller.author_name, caller.author_id, e
                );
                false
            }
        }
    }
}
