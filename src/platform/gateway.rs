//! Implements the platform traits for serenity's [Message] and [CommandInteraction].

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::all::CommandInteraction;
use serenity::all::Context;
use serenity::all::CreateInteractionResponse;
use serenity::all::CreateInteractionResponseFollowup;
use serenity::all::CreateInteractionResponseMessage;
use serenity::all::GuildId;
use serenity::all::Message;
use serenity::all::ResolvedValue;
use serenity::all::UserId;

use super::InteractionContext;
use super::MessageContext;
use crate::error::BotError;

/// Look up the voice channel of `user` in the cached guild.
fn cached_voice_channel(ctx: &Context, guild_id: GuildId, user: UserId) -> Option<ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;
    guild.voice_states.get(&user).and_then(|vs| vs.channel_id)
}

/// A gateway [Message] together with the [Context] needed to answer it.
pub struct GatewayMessage<'a> {
    ctx: &'a Context,
    msg: &'a Message,
}

impl<'a> GatewayMessage<'a> {
    pub fn new(ctx: &'a Context, msg: &'a Message) -> Self {
        Self { ctx, msg }
    }
}

#[async_trait]
impl MessageContext for GatewayMessage<'_> {
    fn guild_id(&self) -> Option<GuildId> {
        self.msg.guild_id
    }

    fn channel_id(&self) -> ChannelId {
        self.msg.channel_id
    }

    fn author_id(&self) -> UserId {
        self.msg.author.id
    }

    fn author_is_bot(&self) -> bool {
        self.msg.author.bot
    }

    fn content(&self) -> &str {
        &self.msg.content
    }

    fn author_voice_channel(&self) -> Option<ChannelId> {
        cached_voice_channel(self.ctx, self.msg.guild_id?, self.msg.author.id)
    }

    async fn reply(&self, content: &str) -> Result<(), BotError> {
        self.msg.reply(self.ctx, content).await?;
        Ok(())
    }
}

/// A gateway [CommandInteraction].
/// Remembers whether it was acknowledged so error replies can pick a follow-up.
pub struct GatewayInteraction<'a> {
    ctx: &'a Context,
    command: &'a CommandInteraction,
    acknowledged: AtomicBool,
}

impl<'a> GatewayInteraction<'a> {
    pub fn new(ctx: &'a Context, command: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            command,
            acknowledged: AtomicBool::new(false),
        }
    }

    async fn respond(&self, message: CreateInteractionResponseMessage) -> Result<(), BotError> {
        self.command
            .create_response(self.ctx, CreateInteractionResponse::Message(message))
            .await?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl InteractionContext for GatewayInteraction<'_> {
    fn command_name(&self) -> &str {
        &self.command.data.name
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.command.guild_id
    }

    fn channel_id(&self) -> ChannelId {
        self.command.channel_id
    }

    fn user_id(&self) -> UserId {
        self.command.user.id
    }

    fn member_voice_channel(&self) -> Option<ChannelId> {
        cached_voice_channel(self.ctx, self.command.guild_id?, self.command.user.id)
    }

    fn string_option(&self, name: &str) -> Option<String> {
        self.command
            .data
            .options()
            .into_iter()
            .find(|opt| opt.name == name)
            .and_then(|opt| match opt.value {
                ResolvedValue::String(s) => Some(s.to_string()),
                _ => None,
            })
    }

    async fn reply(&self, content: &str) -> Result<(), BotError> {
        self.respond(CreateInteractionResponseMessage::new().content(content))
            .await
    }

    async fn reply_ephemeral(&self, content: &str) -> Result<(), BotError> {
        if self.acknowledged.load(Ordering::SeqCst) {
            let followup = CreateInteractionResponseFollowup::new()
                .content(content)
                .ephemeral(true);
            self.command.create_followup(self.ctx, followup).await?;
            Ok(())
        } else {
            self.respond(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            )
            .await
        }
    }

    async fn defer(&self) -> Result<(), BotError> {
        self.command.defer(self.ctx).await?;
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, content: &str) -> Result<(), BotError> {
        let followup = CreateInteractionResponseFollowup::new().content(content);
        self.command.create_followup(self.ctx, followup).await?;
        Ok(())
    }
}
