//! Implements the `help` command.
//!
//! Lists every loaded command with its description and the prefix to use.

use async_trait::async_trait;
use itertools::Itertools;

use crate::data::Data;
use crate::error::BotError;
use crate::error::LoadError;
use crate::registry::CommandModule;
use crate::registry::PrefixContext;
use crate::registry::PrefixHandler;
use crate::registry::SlashContext;
use crate::registry::SlashHandler;
use crate::registry::SlashSchema;

pub fn module() -> Result<CommandModule, LoadError> {
    Ok(CommandModule::new()
        .slash(SlashSchema::new("help", "List what I can do"), Help)
        .prefix(Help))
}

struct Help;

/// One line per command, sorted by name.
fn listing(data: &Data, prefix: &str) -> String {
    let commands = data
        .registry
        .iter()
        .map(|command| match command.description() {
            Some(description) => format!("`{}` {description}", command.name()),
            None => format!("`{prefix}{}`", command.name()),
        })
        .join("\n");

    format!("**Commands** (prefix: `{prefix}`)\n{commands}")
}

#[async_trait]
impl SlashHandler for Help {
    async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
        let prefixes = &ctx.data.prefixes;
        let prefix = ctx
            .interaction
            .guild_id()
            .map_or(prefixes.default_prefix(), |guild| prefixes.resolve(guild));
        ctx.interaction.reply(&listing(ctx.data, prefix)).await
    }
}

#[async_trait]
impl PrefixHandler for Help {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        ctx.message.reply(&listing(ctx.data, ctx.prefix)).await
    }
}
