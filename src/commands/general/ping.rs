//! Implements the `ping` prefix command.

use async_trait::async_trait;

use crate::error::BotError;
use crate::error::LoadError;
use crate::registry::CommandModule;
use crate::registry::PrefixContext;
use crate::registry::PrefixHandler;

pub fn module() -> Result<CommandModule, LoadError> {
    Ok(CommandModule::new().prefix(Ping))
}

struct Ping;

#[async_trait]
impl PrefixHandler for Ping {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        ctx.message.reply("🏓 Pong!").await
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::audio::MockAudioEngine;
    use crate::commands::Builtin;
    use crate::dispatch::message::dispatch;
    use crate::dispatch::MessageOutcome;
    use crate::platform::testing;
    use crate::platform::testing::FakeMessage;
    use crate::platform::testing::Sent;

    #[tokio::test]
    async fn pongs_with_the_default_prefix() {
        let data = testing::data(&Builtin, MockAudioEngine::new());
        let message = FakeMessage::new(1, "angela^ping");

        let outcome = dispatch(&data, &message).await;

        assert_eq!(outcome, MessageOutcome::Handled { command: "ping".to_string() });
        assert_eq!(message.sent(), vec![Sent::Reply("🏓 Pong!".to_string())]);
    }
}
