mod audio;
mod bot;
mod commands;
mod data;
mod dispatch;
mod error;
mod log;
mod platform;
mod registry;
mod setup;

use error::BotError;
use setup::config::ConfigSource;
use setup::config::CONFIG_PATH;
use setup::Config;

#[tokio::main]
async fn main() -> Result<(), BotError> {
    // Load before reading the token. A missing .env is fine.
    let dotenv = dotenv::dotenv();

    let (config, source) = Config::read(CONFIG_PATH)?;

    // Logs are only written while this is held.
    let _guard = log::install_tracing(&config);

    if source == ConfigSource::CreatedDefault {
        tracing::info!("No config found, wrote the default one to {CONFIG_PATH}.");
    }
    if let Err(e) = dotenv {
        tracing::debug!("No .env loaded: {e}");
    }

    let mut client = setup::client(config).await?;

    if let Err(e) = client.start().await {
        let error = BotError::Login(e);
        tracing::error!("{error}");
        return Err(error);
    }

    Ok(())
}
