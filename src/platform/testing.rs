//! Recording fakes of the platform traits.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::all::GuildId;
use serenity::all::UserId;

use super::InteractionContext;
use super::MessageContext;
use crate::audio::MockAudioEngine;
use crate::data::Data;
use crate::data::PrefixStore;
use crate::error::BotError;
use crate::registry::CommandRegistry;
use crate::registry::CommandSource;

/// Something the bot sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Reply(String),
    Ephemeral(String),
    Defer,
    FollowUp(String),
}

/// A guild text channel id used by the fakes.
pub const TEXT_CHANNEL: ChannelId = ChannelId::new(20);
/// A voice channel id used by the fakes.
pub const VOICE_CHANNEL: ChannelId = ChannelId::new(30);
/// The author/invoker id used by the fakes.
pub const USER: UserId = UserId::new(40);

#[derive(Debug)]
pub struct FakeMessage {
    pub guild: Option<GuildId>,
    pub bot: bool,
    pub content: String,
    pub voice: Option<ChannelId>,
    pub sent: Mutex<Vec<Sent>>,
}

impl FakeMessage {
    /// A human message in `guild`.
    pub fn new(guild: u64, content: &str) -> Self {
        Self {
            guild: Some(GuildId::new(guild)),
            bot: false,
            content: content.to_string(),
            voice: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn in_voice(mut self) -> Self {
        self.voice = Some(VOICE_CHANNEL);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageContext for FakeMessage {
    fn guild_id(&self) -> Option<GuildId> {
        self.guild
    }

    fn channel_id(&self) -> ChannelId {
        TEXT_CHANNEL
    }

    fn author_id(&self) -> UserId {
        USER
    }

    fn author_is_bot(&self) -> bool {
        self.bot
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn author_voice_channel(&self) -> Option<ChannelId> {
        self.voice
    }

    async fn reply(&self, content: &str) -> Result<(), BotError> {
        self.sent.lock().unwrap().push(Sent::Reply(content.to_string()));
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeInteraction {
    pub name: String,
    pub guild: Option<GuildId>,
    pub voice: Option<ChannelId>,
    pub options: Vec<(String, String)>,
    /// Make `defer` fail, as if discord rejected it.
    pub fail_defer: bool,
    pub sent: Mutex<Vec<Sent>>,
}

impl FakeInteraction {
    /// A slash command used in guild 1 by someone not in voice.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            guild: Some(GuildId::new(1)),
            voice: None,
            options: Vec::new(),
            fail_defer: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn option(mut self, name: &str, value: &str) -> Self {
        self.options.push((name.to_string(), value.to_string()));
        self
    }

    pub fn in_voice(mut self) -> Self {
        self.voice = Some(VOICE_CHANNEL);
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    fn push(&self, sent: Sent) -> Result<(), BotError> {
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl InteractionContext for FakeInteraction {
    fn command_name(&self) -> &str {
        &self.name
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.guild
    }

    fn channel_id(&self) -> ChannelId {
        TEXT_CHANNEL
    }

    fn user_id(&self) -> UserId {
        USER
    }

    fn member_voice_channel(&self) -> Option<ChannelId> {
        self.voice
    }

    fn string_option(&self, name: &str) -> Option<String> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    async fn reply(&self, content: &str) -> Result<(), BotError> {
        self.push(Sent::Reply(content.to_string()))
    }

    async fn reply_ephemeral(&self, content: &str) -> Result<(), BotError> {
        self.push(Sent::Ephemeral(content.to_string()))
    }

    async fn defer(&self) -> Result<(), BotError> {
        if self.fail_defer {
            return Err(BotError::MissingFromSetup {
                reason: "defer rejected".to_string(),
            });
        }
        self.push(Sent::Defer)
    }

    async fn follow_up(&self, content: &str) -> Result<(), BotError> {
        self.push(Sent::FollowUp(content.to_string()))
    }
}

/// Guild with the custom prefix [CUSTOM_PREFIX] in [data].
pub const CUSTOM_GUILD: u64 = 2;
/// Prefix of [CUSTOM_GUILD].
pub const CUSTOM_PREFIX: &str = "xx!";

/// Shared state with `modules` loaded, `engine` for music and
/// [CUSTOM_PREFIX] set in [CUSTOM_GUILD]. Every other guild uses `angela^`.
pub fn data<S>(modules: &S, engine: MockAudioEngine) -> Data
where
    S: CommandSource + ?Sized,
{
    let prefixes = PrefixStore::new("angela^").with(GuildId::new(CUSTOM_GUILD), CUSTOM_PREFIX);
    let (registry, _) = CommandRegistry::load_all(modules);
    Data::new(prefixes, registry, Arc::new(engine))
}
