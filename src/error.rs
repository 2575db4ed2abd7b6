//! Error types for the bot.
//!
//! [BotError] is what command handlers and startup return. The other enums
//! describe one failure domain each, so callers can decide what is fatal.

use std::path::PathBuf;

use thiserror::Error;

/// Top level error.
#[derive(Debug, Error)]
pub enum BotError {
    /// Errors caused by the user. These are shown to them as-is.
    #[error(transparent)]
    UserError(#[from] UserError),

    /// Bad or missing configuration, fatal at startup.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The audio engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// A request to discord failed.
    #[error("Discord error: {0}")]
    Serenity(#[from] serenity::Error),

    /// The client could not log in or the gateway connection died.
    #[error("Failed to log in: {0}")]
    Login(#[source] serenity::Error),

    /// Something that should have been created during setup is missing.
    #[error("Missing from setup: {reason}")]
    MissingFromSetup { reason: String },
}

/// Errors that are the user's fault, worded for the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("❌ This command only works in a server.")]
    NotInGuild,

    #[error("❌ You need to join a voice channel first!")]
    NotInVoice,

    #[error("❌ Please provide a song name or URL to play.")]
    MissingQuery,

    #[error("❌ I'm not in a voice channel.")]
    NoCall,

    #[error("❌ There is nothing in the queue.")]
    EmptyQueue,
}

/// Problems reading `config.toml` or the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing discord token. Set the `{var}` environment variable.")]
    MissingToken { var: &'static str },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Config IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Problems reading the guild prefix file. None of these are fatal.
#[derive(Debug, Error)]
pub enum PrefixError {
    #[error("No prefix file at {}", path.display())]
    Missing { path: PathBuf },

    #[error("Could not read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed prefix file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A command module that could not be constructed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("invalid slash schema: {reason}")]
    InvalidSchema { reason: String },

    #[error("unusable command name '{name}'")]
    UnusableName { name: String },
}

/// Failures inside the audio engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Not connected to a voice channel.")]
    NotConnected,

    #[error("Could not join the voice channel: {0}")]
    Join(#[from] songbird::error::JoinError),

    #[error("Could not control the track: {0}")]
    Control(#[from] songbird::error::ControlError),

    #[error("Search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid UTF-8 from yt-dlp: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}
