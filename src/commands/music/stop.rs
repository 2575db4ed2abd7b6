//! Implements the `stop` command.
//!
//! This stops all bot actions, clears the queue, and disconnects the
//! bot from the current voice channel.

use async_trait::async_trait;
use serenity::all::GuildId;

use super::engine_error;
use crate::commands::guild_only;
use crate::data::Data;
use crate::error::BotError;
use crate::error::LoadError;
use crate::registry::CommandModule;
use crate::registry::PrefixContext;
use crate::registry::PrefixHandler;
use crate::registry::SlashContext;
use crate::registry::SlashHandler;
use crate::registry::SlashSchema;

const STOPPED: &str = "⏹️ Queue deleted.";

pub fn module() -> Result<CommandModule, LoadError> {
    Ok(CommandModule::new()
        .slash(
            SlashSchema::new("stop", "Stop playing, clear the queue and leave"),
            Stop,
        )
        .prefix(Stop))
}

struct Stop;

async fn stop(data: &Data, guild_id: GuildId) -> Result<(), BotError> {
    data.engine.stop(guild_id).await.map_err(engine_error)
}

#[async_trait]
impl SlashHandler for Stop {
    async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
        let guild_id = guild_only(ctx.interaction.guild_id())?;
        stop(ctx.data, guild_id).await?;
        ctx.interaction.reply(STOPPED).await
    }
}

#[async_trait]
impl PrefixHandler for Stop {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        let guild_id = guild_only(ctx.message.guild_id())?;
        stop(ctx.data, guild_id).await?;
        ctx.message.reply(STOPPED).await
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::STOPPED;
    use crate::audio::MockAudioEngine;
    use crate::commands::Builtin;
    use crate::dispatch;
    use crate::error::EngineError;
    use crate::error::UserError;
    use crate::platform::testing;
    use crate::platform::testing::FakeMessage;
    use crate::platform::testing::Sent;

    #[tokio::test]
    async fn stops() {
        let mut engine = MockAudioEngine::new();
        engine.expect_stop().times(1).returning(|_| Ok(()));
        let data = testing::data(&Builtin, engine);
        let message = FakeMessage::new(1, "angela^stop");

        dispatch::message::dispatch(&data, &message).await;

        assert_eq!(message.sent(), vec![Sent::Reply(STOPPED.to_string())]);
    }

    #[tokio::test]
    async fn not_in_a_call() {
        let mut engine = MockAudioEngine::new();
        engine
            .expect_stop()
            .returning(|_| Err(EngineError::NotConnected));
        let data = testing::data(&Builtin, engine);
        let message = FakeMessage::new(1, "angela^stop");

        dispatch::message::dispatch(&data, &message).await;

        assert_eq!(message.sent(), vec![Sent::Reply(UserError::NoCall.to_string())]);
    }
}
