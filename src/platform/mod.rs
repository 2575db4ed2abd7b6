//! The parts of the chat platform the dispatchers talk to.
//!
//! Dispatchers and commands only see these traits. [gateway] implements them
//! for real serenity events and the tests implement them with recording fakes.

pub mod gateway;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::all::GuildId;
use serenity::all::UserId;

use crate::error::BotError;

/// An inbound text message.
#[async_trait]
pub trait MessageContext: Send + Sync {
    /// Guild the message was sent in, `None` for DMs.
    fn guild_id(&self) -> Option<GuildId>;
    /// Channel the message was sent in.
    fn channel_id(&self) -> ChannelId;
    /// Author of the message.
    fn author_id(&self) -> UserId;
    /// Whether the author is an automated account.
    fn author_is_bot(&self) -> bool;
    /// Raw text of the message.
    fn content(&self) -> &str;
    /// Voice channel the author is currently connected to.
    fn author_voice_channel(&self) -> Option<ChannelId>;
    /// Reply to the message.
    async fn reply(&self, content: &str) -> Result<(), BotError>;
}

/// An inbound slash command interaction.
#[async_trait]
pub trait InteractionContext: Send + Sync {
    /// Name of the invoked command.
    fn command_name(&self) -> &str;
    /// Guild the command was used in, `None` for DMs.
    fn guild_id(&self) -> Option<GuildId>;
    /// Channel the command was used in.
    fn channel_id(&self) -> ChannelId;
    /// Invoking user.
    fn user_id(&self) -> UserId;
    /// Voice channel the invoking member is currently connected to.
    fn member_voice_channel(&self) -> Option<ChannelId>;
    /// Value of a string option, if given.
    fn string_option(&self, name: &str) -> Option<String>;
    /// Respond immediately, visible to everyone.
    async fn reply(&self, content: &str) -> Result<(), BotError>;
    /// Respond so only the invoking user sees it.
    /// Uses a follow-up when the interaction was already acknowledged.
    async fn reply_ephemeral(&self, content: &str) -> Result<(), BotError>;
    /// Acknowledge now and answer later with [InteractionContext::follow_up].
    async fn defer(&self) -> Result<(), BotError>;
    /// Send a message after the interaction was acknowledged.
    async fn follow_up(&self, content: &str) -> Result<(), BotError>;
}
