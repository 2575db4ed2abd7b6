//! The gateway event handler.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::Context;
use serenity::all::EventHandler;
use serenity::all::Interaction;
use serenity::all::Message;
use serenity::all::Ready;
use songbird::Songbird;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::audio::SongbirdEngine;
use crate::commands::Builtin;
use crate::data::Data;
use crate::data::PrefixStore;
use crate::dispatch;
use crate::platform::gateway::GatewayInteraction;
use crate::platform::gateway::GatewayMessage;
use crate::registry::publish::publish;
use crate::registry::CommandRegistry;
use crate::setup::Config;

/// Routes gateway events to the dispatchers.
pub struct Handler {
    config: Config,
    manager: Arc<Songbird>,
    /// Client internally uses an Arc, so this is cheap to clone
    http_client: reqwest::Client,
    /// Set on the first ready event.
    data: OnceCell<Data>,
}

impl Handler {
    pub fn new(config: Config, manager: Arc<Songbird>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            manager,
            http_client,
            data: OnceCell::new(),
        }
    }

    /// Load prefixes and commands, publish the slash commands and build the engine.
    #[instrument(skip_all)]
    async fn setup(&self, ctx: &Context) -> Data {
        let prefixes =
            PrefixStore::load_or_default(self.config.prefix_file(), self.config.default_prefix());

        let (registry, _) = CommandRegistry::load_all(&Builtin);
        if registry.is_empty() {
            tracing::warn!("No commands loaded.");
        }
        publish(&*ctx.http, self.config.dev_guild(), registry.catalog()).await;

        let engine = SongbirdEngine::new(ctx.clone(), self.manager.clone(), self.http_client.clone());
        Data::new(prefixes, registry, Arc::new(engine))
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        // Simple message that logs when the bot has initialized
        tracing::info!("{} is ready!", ready.user.name);

        // Reconnects fire ready again, setup only runs once.
        self.data.get_or_init(|| self.setup(&ctx)).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        let Some(data) = self.data.get() else {
            tracing::debug!("Message before setup finished, ignoring.");
            return;
        };

        let message = GatewayMessage::new(&ctx, &msg);
        let outcome = dispatch::message::dispatch(data, &message).await;
        tracing::trace!(?outcome, "Message handled.");
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };
        let Some(data) = self.data.get() else {
            tracing::debug!("Interaction before setup finished, ignoring.");
            return;
        };

        let interaction = GatewayInteraction::new(&ctx, &command);
        let outcome = dispatch::interaction::dispatch(data, &interaction).await;
        tracing::trace!(?outcome, "Interaction handled.");
    }
}
