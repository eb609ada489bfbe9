//! DKP Bot for Discord
//!
//! Answers guild chat commands about DKP standings, raid summaries, spell
//! ownership and krono prices, reading everything from the guild's Google
//! spreadsheets on demand.

mod actions;
mod chunk;
mod config;
mod dispatch;
mod errors;
mod handlers;
mod prices;
mod registry;
mod roster;
mod spells;
mod summary;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use dkp_sheets::GoogleSheets;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::handlers::{DispatcherKey, Handler};
use crate::prices::KronoClient;
use crate::registry::CommandRegistry;

/// DKP Bot CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/dkp-bot.toml")]
    config: String,

    /// Discord bot token (overrides config file)
    #[arg(long, env = "DISCORD_BOT_TOKEN")]
    bot_token: Option<String>,

    /// Google Sheets OAuth access token (overrides config file)
    #[arg(long, env = "SHEETS_ACCESS_TOKEN")]
    sheets_token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dkp_bot=debug,dkp_sheets=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DKP bot");

    let args = Args::parse();

    info!("Loading config from file: {}", args.config);
    let mut config = Config::from_file(&args.config)?;
    if let Some(bot_token) = args.bot_token {
        config.discord.bot_token = bot_token;
    }
    if let Some(sheets_token) = args.sheets_token {
        config.sheets.access_token = sheets_token;
    }

    for w in config.warnings() {
        warn!("Config: {}", w);
    }

    let registry =
        CommandRegistry::from_config(&config.commands).context("Invalid command configuration")?;
    info!("Registered {} commands", registry.len());

    let sheets = GoogleSheets::new(&config.sheets).context("Failed to set up Sheets client")?;
    let prices = KronoClient::new(&config.price_feed)?;

    let bot_token = config.discord.bot_token.clone();
    let dispatcher = Arc::new(Dispatcher::new(registry, config, sheets, prices));

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS;

    let mut client = Client::builder(&bot_token, intents)
        .event_handler(Handler)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Discord client: {}", e))?;

    {
        let mut data = client.data.write().await;
        data.insert::<DispatcherKey>(dispatcher);
    }

    // Graceful shutdown: close all shards on SIGTERM or Ctrl+C.
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    tokio::signal::ctrl_c().await.ok();
                }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }
        info!("Shutdown signal received, stopping Discord client...");
        shard_manager.shutdown_all().await;
    });

    info!("Starting Discord gateway connection...");

    // Blocks until all shards are stopped
    client
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Discord client error: {}", e))?;

    info!("DKP bot stopped");
    Ok(())
}
