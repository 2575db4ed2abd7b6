//! Publishes the slash command catalog to discord.

use async_trait::async_trait;
use serenity::all::Command;
use serenity::all::CommandOptionType;
use serenity::all::CreateCommand;
use serenity::all::CreateCommandOption;
use serenity::all::GuildId;
use serenity::all::Http;
use tracing::instrument;

use super::OptionKind;
use super::SlashSchema;
use crate::error::BotError;

/// The remote catalog of application commands.
#[async_trait]
pub trait CommandCatalogApi: Send + Sync {
    /// Replace every global command, returning the names discord accepted.
    async fn set_global(&self, commands: Vec<CreateCommand>) -> Result<Vec<String>, BotError>;

    /// Replace every command of `guild`, returning the names discord accepted.
    async fn set_guild(
        &self,
        guild: GuildId,
        commands: Vec<CreateCommand>,
    ) -> Result<Vec<String>, BotError>;
}

#[async_trait]
impl CommandCatalogApi for Http {
    async fn set_global(&self, commands: Vec<CreateCommand>) -> Result<Vec<String>, BotError> {
        let set = Command::set_global_commands(self, commands).await?;
        Ok(set.into_iter().map(|c| c.name).collect())
    }

    async fn set_guild(
        &self,
        guild: GuildId,
        commands: Vec<CreateCommand>,
    ) -> Result<Vec<String>, BotError> {
        let set = guild.set_commands(self, commands).await?;
        Ok(set.into_iter().map(|c| c.name).collect())
    }
}

impl From<OptionKind> for CommandOptionType {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::String => CommandOptionType::String,
            OptionKind::Integer => CommandOptionType::Integer,
            OptionKind::Number => CommandOptionType::Number,
            OptionKind::Boolean => CommandOptionType::Boolean,
            OptionKind::User => CommandOptionType::User,
            OptionKind::Channel => CommandOptionType::Channel,
            OptionKind::Role => CommandOptionType::Role,
        }
    }
}

impl From<&SlashSchema> for CreateCommand {
    fn from(schema: &SlashSchema) -> Self {
        schema.options.iter().fold(
            CreateCommand::new(&schema.name).description(&schema.description),
            |command, option| {
                command.add_option(
                    CreateCommandOption::new(option.kind.into(), &option.name, &option.description)
                        .required(option.required),
                )
            },
        )
    }
}

/// Outcome of a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Published {
    /// The global set was replaced with these commands.
    Registered { names: Vec<String> },
    /// Discord rejected the global set. Already logged.
    Failed,
}

/// Replace the global slash commands with `catalog`, and the dev guild's too if set.
/// Failures are logged and never retried.
#[instrument(level = "debug", skip_all, fields(commands = catalog.len()))]
pub async fn publish<A>(api: &A, dev_guild: Option<GuildId>, catalog: &[SlashSchema]) -> Published
where
    A: CommandCatalogApi + ?Sized,
{
    let commands: Vec<CreateCommand> = catalog.iter().map(CreateCommand::from).collect();

    if let Some(guild) = dev_guild {
        // This is faster than global registers, useful for development.
        tracing::info!("Registering commands on dev guild {guild}.");
        if let Err(e) = api.set_guild(guild, commands.clone()).await {
            tracing::error!("Failed to register commands on dev guild {guild}: {e}");
        }
    }

    match api.set_global(commands).await {
        Ok(names) => {
            tracing::info!("Published {} slash command(s) globally.", names.len());
            Published::Registered { names }
        }
        Err(e) => {
            tracing::error!("Failed to publish slash commands: {e}");
            Published::Failed
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::audio::MockAudioEngine;
    use crate::commands::Builtin;
    use crate::dispatch;
    use crate::dispatch::MessageOutcome;
    use crate::platform::testing;
    use crate::platform::testing::FakeMessage;
    use crate::platform::testing::Sent;
    use crate::registry::CommandRegistry;
    use crate::registry::OptionSchema;

    /// Accepts everything and remembers where it went.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(Option<GuildId>, usize)>>,
    }

    #[async_trait]
    impl CommandCatalogApi for Recording {
        async fn set_global(&self, commands: Vec<CreateCommand>) -> Result<Vec<String>, BotError> {
            self.calls.lock().unwrap().push((None, commands.len()));
            Ok(commands
                .iter()
                .map(|c| serde_json::to_value(c).unwrap()["name"].to_string())
                .collect())
        }

        async fn set_guild(
            &self,
            guild: GuildId,
            commands: Vec<CreateCommand>,
        ) -> Result<Vec<String>, BotError> {
            self.calls.lock().unwrap().push((Some(guild), commands.len()));
            Ok(Vec::new())
        }
    }

    /// Rejects everything.
    struct Rejecting;

    #[async_trait]
    impl CommandCatalogApi for Rejecting {
        async fn set_global(&self, _commands: Vec<CreateCommand>) -> Result<Vec<String>, BotError> {
            Err(BotError::MissingFromSetup {
                reason: "rejected".to_string(),
            })
        }

        async fn set_guild(
            &self,
            _guild: GuildId,
            _commands: Vec<CreateCommand>,
        ) -> Result<Vec<String>, BotError> {
            Err(BotError::MissingFromSetup {
                reason: "rejected".to_string(),
            })
        }
    }

    fn catalog() -> Vec<SlashSchema> {
        vec![
            SlashSchema::new("help", "List commands"),
            SlashSchema::new("play", "Play a song")
                .option(OptionSchema::string("query", "Song name or URL").required()),
        ]
    }

    #[test]
    fn schema_converts_to_create_command() {
        let schema = &catalog()[1];
        let json = serde_json::to_value(CreateCommand::from(schema)).unwrap();

        assert_eq!(json["name"], "play");
        assert_eq!(json["description"], "Play a song");
        assert_eq!(json["options"][0]["name"], "query");
        assert_eq!(json["options"][0]["required"], true);
    }

    #[tokio::test]
    async fn publishes_globally() {
        let api = Recording::default();
        let published = publish(&api, None, &catalog()).await;

        assert!(matches!(published, Published::Registered { ref names } if names.len() == 2));
        assert_eq!(*api.calls.lock().unwrap(), vec![(None, 2)]);
    }

    #[tokio::test]
    async fn dev_guild_gets_the_same_set() {
        let api = Recording::default();
        let guild = GuildId::new(7);
        publish(&api, Some(guild), &catalog()).await;

        assert_eq!(*api.calls.lock().unwrap(), vec![(Some(guild), 2), (None, 2)]);
    }

    #[tokio::test]
    async fn rejection_is_reported_not_propagated() {
        let (registry, _) = CommandRegistry::load_all(&Builtin);
        let published = publish(&Rejecting, Some(GuildId::new(7)), registry.catalog()).await;
        assert_eq!(published, Published::Failed);

        // Commands still work after a failed publish.
        let data = testing::data(&Builtin, MockAudioEngine::new());
        let message = FakeMessage::new(1, "angela^ping");
        let outcome = dispatch::message::dispatch(&data, &message).await;

        assert_eq!(outcome, MessageOutcome::Handled { command: "ping".to_string() });
        assert_eq!(message.sent(), vec![Sent::Reply("🏓 Pong!".to_string())]);
    }
}
