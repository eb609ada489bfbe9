//! Serenity event handler implementation

use std::sync::Arc;

use anyhow::Context as _;
use dkp_sheets::GoogleSheets;
use serenity::async_trait;
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::{GuildId, UserId};
use serenity::prelude::*;
use tracing::{debug, error, info};

use crate::chunk::chunk;
use crate::dispatch::{tokenize, Dispatcher, MessageContext, RoleDirectory};
use crate::prices::KronoClient;

/// Dispatcher wired to the production clients.
pub type GuildDispatcher = Dispatcher<GoogleSheets, KronoClient>;

/// TypeMap key under which the dispatcher is stored in the client data.
pub struct DispatcherKey;

impl TypeMapKey for DispatcherKey {
    type Value = Arc<GuildDispatcher>;
}

/// Role lookups against the gateway cache, falling back to the Discord REST
/// API when the guild or member has not been cached yet.
pub struct SerenityRoles {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityRoles {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    /// Role names from the cache, `None` on a miss. The cache guard is
    /// released before returning.
    fn cached_role_names(&self, guild_id: GuildId, user_id: UserId) -> Option<Vec<String>> {
        let guild = self.cache.guild(guild_id)?;
        let member = guild.members.get(&user_id)?;
        Some(
            member
                .roles
                .iter()
                .filter_map(|id| guild.roles.get(id))
                .map(|role| role.name.clone())
                .collect(),
        )
    }
}

impl RoleDirectory for SerenityRoles {
    async fn role_names(&self, guild_id: u64, user_id: u64) -> anyhow::Result<Vec<String>> {
        if guild_id == 0 || user_id == 0 {
            anyhow::bail!("guild and user ids must be non-zero");
        }
        let guild = GuildId::new(guild_id);
        let user = UserId::new(user_id);
        if let Some(names) = self.cached_role_names(guild, user) {
            return Ok(names);
        }

        debug!("Roles of {} in guild {} not cached, asking the API", user_id, guild_id);
        let member = self
            .http
            .get_member(guild, user)
            .await
            .with_context(|| format!("Failed to fetch member {} of guild {}", user_id, guild_id))?;
        let roles = self
            .http
            .get_guild_roles(guild)
            .await
            .with_context(|| format!("Failed to fetch roles of guild {}", guild_id))?;

        Ok(roles
            .into_iter()
            .filter(|role| member.roles.contains(&role.id))
            .map(|role| role.name)
            .collect())
    }
}

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            "Discord bot connected as {} ({} guilds)",
            ready.user.name,
            ready.guilds.len()
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Skip bot messages, including our own replies
        if msg.author.bot {
            return;
        }

        let dispatcher = {
            let data = ctx.data.read().await;
            match data.get::<DispatcherKey>() {
                Some(d) => d.clone(),
                None => {
                    error!("Dispatcher not found in context data");
                    return;
                }
            }
        };

        let tokens = tokenize(&msg.content);
        let caller = MessageContext {
            author_id: msg.author.id.get(),
            author_name: msg.author.name.clone(),
            channel_id: msg.channel_id.get(),
            guild_id: msg.guild_id.map(|g| g.get()),
            is_dm: msg.guild_id.is_none(),
        };
        let roles = SerenityRoles::new(ctx.http.clone(), ctx.cache.clone());

        let response = dispatcher.dispatch(&tokens, &caller, &roles).await;
        if response.is_empty() {
            return;
        }

        let limit = dispatcher.config().discord.max_message_length;
        for (i, part) in chunk(&response, limit).enumerate() {
            debug!("Sending chunk {} ({} chars) to {}", i, part.chars().count(), msg.channel_id);
            if let Err(e) = msg.channel_id.say(&ctx.http, part).await {
                error!("Failed to send reply to channel {}: {}", msg.channel_id, e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles() -> SerenityRoles {
        SerenityRoles::new(Arc::new(Http::new("token")), Arc::new(Cache::new()))
    }

    #[test]
    fn test_uncached_guild_misses() {
        let roles = roles();
        assert_eq!(roles.cached_role_names(GuildId::new(7), UserId::new(11)), None);
    }

    #[tokio::test]
    async fn test_zero_ids_rejected_without_lookup() {
        let roles = roles();
        assert!(roles.role_names(0, 11).await.is_err());
        assert!(roles.role_names(7, 0).await.is_err());
    }
}
