//! Command registry
//!
//! An ordered, immutable table of chat commands built once at startup. Lookup
//! is by exact (case-insensitive) trigger; order only matters for the help
//! listing because duplicate triggers are rejected up front.

use thiserror::Error;

use crate::config::{CommandOverride, CommandsConfig};

/// Every command trigger starts with this character.
pub const COMMAND_SENTINEL: char = '!';

/// Handler a command runs once its gates pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Dkp,
    DkpClass,
    RaidSummary,
    Help,
    Krono,
    Spell,
    GiveSpell,
    Rules,
    Echo,
}

/// One registered command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Lower-cased trigger word including the sentinel
    pub trigger: String,
    pub help: String,
    /// Only answered in direct messages
    pub dm_only: bool,
    /// Requires one of the configured privileged roles
    pub privileged: bool,
    /// Left out of the help listing
    pub hidden: bool,
    /// Arguments the handler needs before it answers with usage text instead
    pub min_params: usize,
    pub action: Action,
}

impl CommandDescriptor {
    pub fn new(trigger: impl Into<String>, help: impl Into<String>, action: Action) -> Self {
        Self {
            trigger: trigger.into(),
            help: help.into(),
            dm_only: false,
            privileged: false,
            hidden: false,
            min_params: 0,
            action,
        }
    }

    pub fn dm_only(mut self, dm_only: bool) -> Self {
        self.dm_only = dm_only;
        self
    }

    pub fn privileged(mut self, privileged: bool) -> Self {
        self.privileged = privileged;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn min_params(mut self, min_params: usize) -> Self {
        self.min_params = min_params;
        self
    }

    /// Help line, also used as the reply to a call with missing arguments.
    pub fn usage(&self) -> String {
        format!("{}: {}", self.trigger, self.help)
    }

    fn with_override(mut self, o: &CommandOverride) -> Self {
        if let Some(trigger) = &o.trigger {
            self.trigger = trigger.clone();
        }
        if let Some(help) = &o.help {
            self.help = help.clone();
        }
        if let Some(dm_only) = o.dm_only {
            self.dm_only = dm_only;
        }
        if let Some(privileged) = o.privileged {
            self.privileged = privileged;
        }
        if let Some(hidden) = o.hidden {
            self.hidden = hidden;
        }
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command trigger '{0}' must start with '{COMMAND_SENTINEL}'")]
    MissingSentinel(String),

    #[error("command trigger '{0}' is registered more than once")]
    DuplicateTrigger(String),
}

/// Ordered, validated command table
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandDescriptor>,
}

impl CommandRegistry {
    /// Validate and freeze a command list. Triggers are lower-cased; a trigger
    /// without the sentinel or registered twice is an error.
    pub fn new(commands: Vec<CommandDescriptor>) -> Result<Self, RegistryError> {
        let mut seen: Vec<String> = Vec::with_capacity(commands.len());
        let mut validated = Vec::with_capacity(commands.len());
        for mut command in commands {
            command.trigger = command.trigger.trim().to_lowercase();
            if !command.trigger.starts_with(COMMAND_SENTINEL) || command.trigger.len() < 2 {
                return Err(RegistryError::MissingSentinel(command.trigger));
            }
            if seen.contains(&command.trigger) {
                return Err(RegistryError::DuplicateTrigger(command.trigger));
            }
            seen.push(command.trigger.clone());
            validated.push(command);
        }
        Ok(Self {
            commands: validated,
        })
    }

    /// The built-in command set with configured overrides applied.
    pub fn from_config(config: &CommandsConfig) -> Result<Self, RegistryError> {
        Self::new(vec![
            CommandDescriptor::new(
                "!dkp",
                "<player> - show a player's DKP, or a class listing when no player matches",
                Action::Dkp,
            )
            .min_params(1)
            .with_override(&config.dkp),
            CommandDescriptor::new(
                "!summary",
                "<player> <raid date> - show the DKP earned and spent on one raid",
                Action::RaidSummary,
            )
            .min_params(2)
            .with_override(&config.raid_summary),
            CommandDescriptor::new("!help", "list the available commands", Action::Help)
                .with_override(&config.help),
            CommandDescriptor::new(
                "!krono",
                "show the current average krono price",
                Action::Krono,
            )
            .with_override(&config.krono),
            CommandDescriptor::new(
                "!spell",
                "<player> <spell> - check whether a player has a spell",
                Action::Spell,
            )
            .min_params(2)
            .with_override(&config.spell),
            CommandDescriptor::new(
                "!givespell",
                "<player> <spell> - mark a spell as owned on the spell sheet",
                Action::GiveSpell,
            )
            .privileged(true)
            .min_params(2)
            .with_override(&config.give_spell),
            CommandDescriptor::new("!rules", "show the guild rules", Action::Rules)
                .with_override(&config.rules),
            CommandDescriptor::new("!test", "echo the message as the bot saw it", Action::Echo)
                .dm_only(true)
                .privileged(true)
                .hidden(true),
            CommandDescriptor::new(
                "!dkpclass",
                "<class or group> - list DKP for a class or group such as tank or cloth",
                Action::DkpClass,
            )
            .min_params(1)
            .with_override(&config.dkp_class),
        ])
    }

    /// First command whose trigger equals `token` ignoring case.
    pub fn find(&self, token: &str) -> Option<&CommandDescriptor> {
        let token = token.to_lowercase();
        self.commands.iter().find(|c| c.trigger == token)
    }

    /// Commands shown by help, in registration order.
    pub fn visible(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter().filter(|c| !c.hidden)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
