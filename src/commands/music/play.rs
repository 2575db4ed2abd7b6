//! Implements the `play` command.
//!
//! The bot joins the invoker's voice channel and queues the best match for the query.
//! Searching can take a while, so the slash form is deferred and answers with a follow-up.

use async_trait::async_trait;
use tracing::instrument;

use crate::audio::AudioEngine;
use crate::audio::PlayRequest;
use crate::commands::guild_only;
use crate::error::BotError;
use crate::error::LoadError;
use crate::error::UserError;
use crate::registry::CommandModule;
use crate::registry::OptionSchema;
use crate::registry::PrefixContext;
use crate::registry::PrefixHandler;
use crate::registry::SlashContext;
use crate::registry::SlashHandler;
use crate::registry::SlashSchema;

/// Name of the slash option holding the query.
const QUERY: &str = "query";

const NOT_FOUND: &str = "❌ Failed to find the song.";
const PLAY_FAILED: &str = "❌ An error occurred while trying to play your song.";

pub fn module() -> Result<CommandModule, LoadError> {
    let schema = SlashSchema::new("play", "Play a song from a name or URL")
        .option(OptionSchema::string(QUERY, "Song name or URL").required());

    Ok(CommandModule::new().slash(schema, Play).prefix(Play))
}

struct Play;

fn searching(query: &str) -> String {
    format!("🔄 Searching for your song: **{query}**")
}

/// Ask the engine to play, turning the result into the reply.
#[instrument(skip(engine))]
async fn play(engine: &dyn AudioEngine, request: PlayRequest) -> String {
    let query = request.query.clone();
    match engine.play(request).await {
        Ok(Some(handle)) => {
            tracing::debug!("Queued '{}' at {}", handle.title, handle.position);
            searching(&query)
        }
        Ok(None) => NOT_FOUND.to_string(),
        Err(e) => {
            tracing::error!("Failed to play '{query}': {e}");
            PLAY_FAILED.to_string()
        }
    }
}

/// The query of a slash invocation, if it has a usable one.
fn slash_query(ctx: &SlashContext<'_>) -> Option<String> {
    ctx.interaction
        .string_option(QUERY)
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
}

#[async_trait]
impl SlashHandler for Play {
    fn long_running(&self) -> bool {
        true
    }

    fn check(&self, ctx: &SlashContext<'_>) -> Result<(), UserError> {
        guild_only(ctx.interaction.guild_id())?;
        ctx.interaction
            .member_voice_channel()
            .ok_or(UserError::NotInVoice)?;
        slash_query(ctx).ok_or(UserError::MissingQuery)?;
        Ok(())
    }

    async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
        let interaction = ctx.interaction;
        let request = PlayRequest {
            guild_id: guild_only(interaction.guild_id())?,
            voice_channel: interaction
                .member_voice_channel()
                .ok_or(UserError::NotInVoice)?,
            query: slash_query(ctx).ok_or(UserError::MissingQuery)?,
            text_channel: interaction.channel_id(),
            member: interaction.user_id(),
        };

        let reply = play(ctx.data.engine.as_ref(), request).await;
        interaction.follow_up(&reply).await
    }
}

#[async_trait]
impl PrefixHandler for Play {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        let message = ctx.message;
        let guild_id = guild_only(message.guild_id())?;
        let voice_channel = message
            .author_voice_channel()
            .ok_or(UserError::NotInVoice)?;
        if ctx.args.is_empty() {
            return Err(UserError::MissingQuery.into());
        }

        let request = PlayRequest {
            guild_id,
            voice_channel,
            query: ctx.args.join(" "),
            text_channel: message.channel_id(),
            member: message.author_id(),
        };

        let reply = play(ctx.data.engine.as_ref(), request).await;
        message.reply(&reply).await
    }
}
