//! Slash commands.
//!
//! A handler's [check](crate::registry::SlashHandler::check) runs first and its
//! error becomes the immediate reply. Long-running handlers are deferred before
//! they run and answer with follow-ups, the rest answer directly.

use tracing::instrument;

use crate::data::Data;
use crate::log::report_failure;
use crate::log::Surface;
use crate::platform::InteractionContext;
use crate::registry::SlashContext;

/// Ephemeral reply when a command fails outside a deferred run.
pub const PROCESS_FAILED: &str = "❌ Failed to process your command.";

/// Follow-up when a deferred run fails.
pub const LONG_RUNNING_FAILED: &str = "❌ An error occurred while processing your command.";

/// What happened to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Not a slash command of this bot.
    Ignored,
    /// The check failed, the user was told why.
    Rejected { command: String },
    /// The handler ran to completion.
    Completed { command: String },
    /// Something failed, the user was told.
    Failed { command: String },
}

/// Run the slash command `interaction` invoked.
#[instrument(level = "debug", skip_all, fields(command = interaction.command_name(), user = %interaction.user_id()))]
pub async fn dispatch(data: &Data, interaction: &dyn InteractionContext) -> InteractionOutcome {
    let Some(command) = data.registry.get(interaction.command_name()) else {
        tracing::debug!("Unknown slash command.");
        return InteractionOutcome::Ignored;
    };
    let Some(slash) = command.slash() else {
        tracing::debug!("'{}' is prefix only.", command.name());
        return InteractionOutcome::Ignored;
    };

    let name = command.name().to_string();
    let handler = &slash.handler;
    let ctx = SlashContext { interaction, data };

    if let Err(user_error) = handler.check(&ctx) {
        tracing::debug!("'{name}' rejected: {user_error}");
        return match interaction.reply(&user_error.to_string()).await {
            Ok(()) => InteractionOutcome::Rejected { command: name },
            Err(e) => {
                report_failure(Surface::Ephemeral(interaction), e, &name, PROCESS_FAILED).await;
                InteractionOutcome::Failed { command: name }
            }
        };
    }

    tracing::info!("Started '{name}' command from {}.", interaction.user_id());

    let result = if handler.long_running() {
        if let Err(e) = interaction.defer().await {
            report_failure(Surface::Ephemeral(interaction), e, &name, PROCESS_FAILED).await;
            return InteractionOutcome::Failed { command: name };
        }
        handler
            .run(&ctx)
            .await
            .map_err(|e| (e, Surface::FollowUp(interaction), LONG_RUNNING_FAILED))
    } else {
        handler
            .run(&ctx)
            .await
            .map_err(|e| (e, Surface::Ephemeral(interaction), PROCESS_FAILED))
    };

    match result {
        Ok(()) => {
            tracing::info!("Finished '{name}' command.");
            InteractionOutcome::Completed { command: name }
        }
        Err((e, surface, generic)) => {
            report_failure(surface, e, &name, generic).await;
            InteractionOutcome::Failed { command: name }
        }
    }
}

#[cfg(test)]
mod test {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::audio::MockAudioEngine;
    use crate::error::BotError;
    use crate::error::LoadError;
    use crate::error::UserError;
    use crate::platform::testing;
    use crate::platform::testing::FakeInteraction;
    use crate::platform::testing::Sent;
    use crate::registry::test::Noop;
    use crate::registry::CommandModule;
    use crate::registry::ModuleEntry;
    use crate::registry::SlashHandler;
    use crate::registry::SlashSchema;

    /// Answers directly, or fails if asked to.
    struct Direct;

    #[async_trait]
    impl SlashHandler for Direct {
        async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
            match ctx.interaction.string_option("fail") {
                Some(_) => Err(BotError::MissingFromSetup {
                    reason: "asked to fail".to_string(),
                }),
                None => ctx.interaction.reply("done").await,
            }
        }
    }

    /// Deferred, needs a voice channel.
    struct Slow;

    #[async_trait]
    impl SlashHandler for Slow {
        fn long_running(&self) -> bool {
            true
        }

        fn check(&self, ctx: &SlashContext<'_>) -> Result<(), UserError> {
            ctx.interaction
                .member_voice_channel()
                .map(|_| ())
                .ok_or(UserError::NotInVoice)
        }

        async fn run(&self, ctx: &SlashContext<'_>) -> Result<(), BotError> {
            match ctx.interaction.string_option("fail") {
                Some(_) => Err(BotError::MissingFromSetup {
                    reason: "asked to fail".to_string(),
                }),
                None => ctx.interaction.follow_up("slow done").await,
            }
        }
    }

    fn direct() -> Result<CommandModule, LoadError> {
        Ok(CommandModule::new().slash(SlashSchema::new("direct", "Answers now"), Direct))
    }

    fn slow() -> Result<CommandModule, LoadError> {
        Ok(CommandModule::new().slash(SlashSchema::new("slow", "Answers later"), Slow))
    }

    fn ping() -> Result<CommandModule, LoadError> {
        Ok(CommandModule::new().prefix(Noop))
    }

    fn data() -> Data {
        let modules = vec![
            ModuleEntry::new("test", "direct.rs", direct),
            ModuleEntry::new("test", "slow.rs", slow),
            ModuleEntry::new("test", "ping.rs", ping),
        ];
        testing::data(&modules, MockAudioEngine::new())
    }

    #[tokio::test]
    async fn direct_command_answers() {
        let data = data();
        let interaction = FakeInteraction::new("direct");

        let outcome = dispatch(&data, &interaction).await;

        assert_eq!(outcome, InteractionOutcome::Completed { command: "direct".to_string() });
        assert_eq!(interaction.sent(), vec![Sent::Reply("done".to_string())]);
    }

    #[tokio::test]
    async fn direct_failure_is_ephemeral() {
        let data = data();
        let interaction = FakeInteraction::new("direct").option("fail", "yes");

        let outcome = dispatch(&data, &interaction).await;

        assert_eq!(outcome, InteractionOutcome::Failed { command: "direct".to_string() });
        assert_eq!(interaction.sent(), vec![Sent::Ephemeral(PROCESS_FAILED.to_string())]);
    }

    #[tokio::test]
    async fn failed_check_is_the_only_reply() {
        let data = data();
        let interaction = FakeInteraction::new("slow");

        let outcome = dispatch(&data, &interaction).await;

        assert_eq!(outcome, InteractionOutcome::Rejected { command: "slow".to_string() });
        assert_eq!(
            interaction.sent(),
            vec![Sent::Reply(UserError::NotInVoice.to_string())]
        );
    }

    #[tokio::test]
    async fn long_running_is_deferred() {
        let data = data();
        let interaction = FakeInteraction::new("slow").in_voice();

        let outcome = dispatch(&data, &interaction).await;

        assert_eq!(outcome, InteractionOutcome::Completed { command: "slow".to_string() });
        assert_eq!(
            interaction.sent(),
            vec![Sent::Defer, Sent::FollowUp("slow done".to_string())]
        );
    }

    #[tokio::test]
    async fn long_running_failure_follows_up() {
        let data = data();
        let interaction = FakeInteraction::new("slow").in_voice().option("fail", "yes");

        dispatch(&data, &interaction).await;

        assert_eq!(
            interaction.sent(),
            vec![Sent::Defer, Sent::FollowUp(LONG_RUNNING_FAILED.to_string())]
        );
    }

    #[tokio::test]
    async fn rejected_defer_skips_the_run() {
        let data = data();
        let interaction = FakeInteraction {
            fail_defer: true,
            ..FakeInteraction::new("slow").in_voice()
        };

        let outcome = dispatch(&data, &interaction).await;

        assert_eq!(outcome, InteractionOutcome::Failed { command: "slow".to_string() });
        assert_eq!(interaction.sent(), vec![Sent::Ephemeral(PROCESS_FAILED.to_string())]);
    }

    #[tokio::test]
    async fn unknown_and_prefix_only_are_ignored() {
        let data = data();

        for name in ["nope", "ping"] {
            let interaction = FakeInteraction::new(name);
            assert_eq!(dispatch(&data, &interaction).await, InteractionOutcome::Ignored);
            assert!(interaction.sent().is_empty());
        }
    }
}
