//! The command registry.
//!
//! Modules are read from a [CommandSource] in `category/file` order and
//! classified by what they registered:
//! - a slash schema (with or without a prefix handler) is [Classification::Dual],
//! - only a prefix handler is [Classification::PrefixOnly],
//! - nothing at all is [Classification::Invalid] and is skipped.
//!
//! Names are unique, the last module loaded under a name wins.

pub mod module;
pub mod publish;

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use itertools::Itertools;
use tracing::instrument;

use crate::error::LoadError;

pub use module::CommandModule;
pub use module::CommandSource;
pub use module::ModuleEntry;
pub use module::OptionKind;
pub use module::OptionSchema;
pub use module::PrefixContext;
pub use module::PrefixHandler;
pub use module::SlashCommand;
pub use module::SlashContext;
pub use module::SlashHandler;
pub use module::SlashSchema;

/// How a loaded module can be invoked.
#[derive(Clone)]
pub enum CommandKind {
    /// Published as a slash command. Usable from messages too when `prefix` is set.
    Dual {
        slash: SlashCommand,
        prefix: Option<Arc<dyn PrefixHandler>>,
    },
    /// Only usable from messages, named after its file.
    PrefixOnly { prefix: Arc<dyn PrefixHandler> },
}

/// The result of classifying a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Dual,
    PrefixOnly,
    Invalid,
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Dual => write!(f, "slash"),
            Classification::PrefixOnly => write!(f, "prefix only"),
            Classification::Invalid => write!(f, "invalid"),
        }
    }
}

/// A loaded command.
#[derive(Clone)]
pub struct CommandDefinition {
    name: String,
    path: String,
    kind: CommandKind,
}

impl CommandDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `category/file` this command was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn classification(&self) -> Classification {
        match self.kind {
            CommandKind::Dual { .. } => Classification::Dual,
            CommandKind::PrefixOnly { .. } => Classification::PrefixOnly,
        }
    }

    /// Handler for message invocations, if the command supports them.
    pub fn prefix_handler(&self) -> Option<&Arc<dyn PrefixHandler>> {
        match &self.kind {
            CommandKind::Dual { prefix, .. } => prefix.as_ref(),
            CommandKind::PrefixOnly { prefix } => Some(prefix),
        }
    }

    /// The slash half, if the command has one.
    pub fn slash(&self) -> Option<&SlashCommand> {
        match &self.kind {
            CommandKind::Dual { slash, .. } => Some(slash),
            CommandKind::PrefixOnly { .. } => None,
        }
    }

    /// Description from the slash schema.
    pub fn description(&self) -> Option<&str> {
        self.slash().map(|s| s.schema.description.as_str())
    }
}

/// Counts from one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Modules classified as [Classification::Dual].
    pub slash: usize,
    /// Modules classified as [Classification::PrefixOnly].
    pub prefix_only: usize,
    /// Modules that registered nothing.
    pub invalid: usize,
    /// Modules whose loader failed or whose registration was unusable.
    pub failed: usize,
}

/// What a load produced.
#[derive(Debug, Clone)]
pub struct Loaded {
    /// Slash schemas to publish, in scan order.
    pub catalog: Vec<SlashSchema>,
    pub report: LoadReport,
}

/// Why a loaded module was left out of the registry.
enum Rejected {
    /// It registered neither a slash nor a prefix handler.
    Invalid,
    /// What it registered can't be used.
    Failed(LoadError),
}

/// Name-indexed table of loaded commands.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, CommandDefinition>,
    /// Slash schemas of the [CommandKind::Dual] commands, in scan order.
    catalog: Vec<SlashSchema>,
}

impl CommandRegistry {
    /// Build a registry from everything in `source`.
    pub fn load_all<S>(source: &S) -> (Self, Loaded)
    where
        S: CommandSource + ?Sized,
    {
        let mut registry = Self::default();
        let loaded = registry.load(source);
        (registry, loaded)
    }

    /// Load every module of `source` into this registry.
    /// A module that fails or registers nothing is skipped, the rest still load.
    #[instrument(level = "debug", skip_all)]
    pub fn load<S>(&mut self, source: &S) -> Loaded
    where
        S: CommandSource + ?Sized,
    {
        let mut report = LoadReport::default();

        // Deterministic order regardless of how the source lists modules.
        let entries = source
            .modules()
            .into_iter()
            .sorted_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let module = match (entry.load)() {
                Ok(module) => module,
                Err(e) => {
                    tracing::error!("Failed to load command {path}: {e}");
                    report.failed += 1;
                    continue;
                }
            };

            match self.classify(&entry, module) {
                Ok(definition) => {
                    let classification = definition.classification();
                    let label = match definition.kind() {
                        CommandKind::Dual { prefix: Some(_), .. } => "slash & prefix",
                        CommandKind::Dual { prefix: None, .. } => "slash",
                        CommandKind::PrefixOnly { .. } => "prefix only",
                    };
                    tracing::info!("Loaded command {path} as '{}' [{label}]", definition.name());

                    match classification {
                        Classification::Dual => report.slash += 1,
                        _ => report.prefix_only += 1,
                    }
                    self.insert(definition);
                }
                Err(Rejected::Invalid) => {
                    tracing::warn!("Command {path} registers neither a slash nor a prefix handler");
                    report.invalid += 1;
                }
                Err(Rejected::Failed(e)) => {
                    tracing::error!("Failed to load command {path}: {e}");
                    report.failed += 1;
                }
            }
        }

        tracing::info!("Registered {} valid slash commands", report.slash);
        if report.invalid > 0 {
            tracing::warn!("Skipped {} invalid command(s)", report.invalid);
        }
        if report.failed > 0 {
            tracing::error!("{} command(s) failed to load", report.failed);
        }

        Loaded {
            catalog: self.catalog.clone(),
            report,
        }
    }

    /// Turn what a module registered into a definition.
    fn classify(
        &self,
        entry: &ModuleEntry,
        module: CommandModule,
    ) -> Result<CommandDefinition, Rejected> {
        let path = entry.path();

        match (module.slash, module.prefix) {
            (Some(slash), prefix) => {
                slash.schema.validate().map_err(Rejected::Failed)?;
                Ok(CommandDefinition {
                    name: slash.schema.name.clone(),
                    path,
                    kind: CommandKind::Dual { slash, prefix },
                })
            }
            (None, Some(prefix)) => {
                let name = entry.file_stem();
                if name.is_empty() || name.contains(char::is_whitespace) {
                    return Err(Rejected::Failed(LoadError::UnusableName { name }));
                }
                Ok(CommandDefinition {
                    name,
                    path,
                    kind: CommandKind::PrefixOnly { prefix },
                })
            }
            (None, None) => Err(Rejected::Invalid),
        }
    }

    /// Insert, replacing any command of the same name.
    fn insert(&mut self, definition: CommandDefinition) {
        let name = definition.name.clone();

        if let Some(old) = self.commands.get(&name) {
            tracing::warn!(
                "Command '{name}' from {} replaces the one from {}",
                definition.path,
                old.path
            );
        }

        self.catalog.retain(|schema| schema.name != name);
        if let Some(slash) = definition.slash() {
            self.catalog.push(slash.schema.clone());
        }

        self.commands.insert(name, definition);
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    /// All commands, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.commands.values().sorted_by(|a, b| a.name.cmp(&b.name))
    }

    /// Slash schemas of all [CommandKind::Dual] commands, in scan order.
    pub fn catalog(&self) -> &[SlashSchema] {
        &self.catalog
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
