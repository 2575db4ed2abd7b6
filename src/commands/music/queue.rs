//! Implements the `queue` command.
//!
//! The bot responds with a numbered list of the songs in the queue.

use async_trait::async_trait;
use serenity::all::GuildId;

use super::engine_error;
use crate::audio::display_queue;
use crate::commands::guild_only;
use crate::data::Data;
use crate::error::BotError;
use crate::error::LoadError;
use crate::error::UserError;
use crate::registry::CommandModule;
use crate::registry::PrefixContext;
use crate::registry::PrefixHandler;
use crate::registry::SlashContext;
use crate::registry::SlashHandler;
use crate::registry::SlashSchema;

pub fn module() -> Result<CommandModule, LoadError> {
    Ok(CommandModule::new()
        .slash(SlashSchema::new("queue", "Show what's coming up"), Queue)
        .prefix(Queue))
}

struct Queue;

async fn listing(data: &Data, guild_id: GuildId) -> Result<String, BotError> {
    let tracks = data.engine.queue(guild_id).await.map_err(engine_error)?;
    if tracks.is_empty() {
        return Err(UserError::EmptyQueue.into());
    }
    Ok(display_queue(&tracks))
}

#[async_trait]
impl SlashHandler for Queue {
    async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
        let guild_id = guild_only(ctx.interaction.guild_id())?;
        let reply = listing(ctx.data, guild_id).await?;
        ctx.interaction.reply(&reply).await
    }
}

#[async_trait]
impl PrefixHandler for Queue {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        let guild_id = guild_only(ctx.message.guild_id())?;
        let reply = listing(ctx.data, guild_id).await?;
        ctx.message.reply(&reply).await
    }
}
