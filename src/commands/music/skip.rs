//! Implements the `skip` command.
//!
//! The bot will skip the current track and start playing the next one
//! in the queue (if there is one).

use async_trait::async_trait;
use serenity::all::GuildId;

use super::engine_error;
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
        .slash(SlashSchema::new("skip", "Skip the current track"), Skip)
        .prefix(Skip))
}

struct Skip;

async fn skip(data: &Data, guild_id: GuildId) -> Result<String, BotError> {
    let skipped = data.engine.skip(guild_id).await.map_err(engine_error)?;
    let track = skipped.ok_or(UserError::EmptyQueue)?;
    Ok(format!("⏭️ Skipping `{}`", track.title()))
}

#[async_trait]
impl SlashHandler for Skip {
    async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
        let guild_id = guild_only(ctx.interaction.guild_id())?;
        let reply = skip(ctx.data, guild_id).await?;
        ctx.interaction.reply(&reply).await
    }
}

#[async_trait]
impl PrefixHandler for Skip {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        let guild_id = guild_only(ctx.message.guild_id())?;
        let reply = skip(ctx.data, guild_id).await?;
        ctx.message.reply(&reply).await
    }
}
