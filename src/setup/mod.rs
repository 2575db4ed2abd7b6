//! Builds the client.

pub mod config;

use songbird::SerenityInit;
use songbird::Songbird;

use serenity::all::Client;
use serenity::all::GatewayIntents;

use crate::bot::Handler;
use crate::error::BotError;

pub use config::Config;

/// Constructs a [Client] with the bot's [Handler] and [songbird] registered.
pub async fn client(config: Config) -> Result<Client, BotError> {
    // Get discord token from the environment
    let token = Config::token()?;

    // Intents we wish to use
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_VOICE_STATES;

    // The handler needs the manager to build the audio engine.
    let manager = Songbird::serenity();
    let handler = Handler::new(config, manager.clone(), reqwest::Client::new());

    let client = Client::builder(token, intents)
        .event_handler(handler)
        .register_songbird_with(manager)
        .await?;

    Ok(client)
}
