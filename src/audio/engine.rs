//! The [songbird] backed [AudioEngine].

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::all::Context;
use serenity::all::GuildId;
use songbird::input::YoutubeDl;
use songbird::tracks::Track;
use songbird::tracks::TrackHandle;
use songbird::Songbird;
use tokio::sync::Mutex;
use tracing::instrument;

use super::events;
use super::events::NowPlaying;
use super::youtube;
use super::AudioEngine;
use super::PlayRequest;
use super::QueueHandle;
use super::TrackInfo;
use crate::error::EngineError;

/// Convenience type alias for [songbird::Call].
pub type CallRef = Arc<Mutex<songbird::Call>>;

/// Plays yt-dlp resolved tracks through songbird.
pub struct SongbirdEngine {
    /// Needed by the idle check and announcements.
    ctx: Context,
    manager: Arc<Songbird>,
    /// Shared by every [YoutubeDl] input.
    http_client: reqwest::Client,
    /// Held while looking up or creating a call.
    creating: Mutex<()>,
}

impl SongbirdEngine {
    pub fn new(ctx: Context, manager: Arc<Songbird>, http_client: reqwest::Client) -> Self {
        Self {
            ctx,
            manager,
            http_client,
            creating: Mutex::new(()),
        }
    }

    /// The guild's call, if the bot has one.
    fn call(&self, guild_id: GuildId) -> Result<CallRef, EngineError> {
        self.manager.get(guild_id).ok_or(EngineError::NotConnected)
    }

    /// Join `channel`, registering global events the first time a call is made for the guild.
    #[instrument(level = "debug", skip(self))]
    async fn join(&self, guild_id: GuildId, channel: ChannelId) -> Result<CallRef, EngineError> {
        let (call, created) = get_or_create(&self.manager, &self.creating, guild_id).await;
        if created {
            events::register_global_events(&call, &self.ctx).await;
        }

        tracing::info!("Joining {channel} in {guild_id}");
        let call = self.manager.join(guild_id, channel).await?;
        Ok(call)
    }
}

/// The guild's call, creating it if there is none.
/// Only one of any concurrent callers sees `true` for a new call.
async fn get_or_create(
    manager: &Songbird,
    creating: &Mutex<()>,
    guild_id: GuildId,
) -> (CallRef, bool) {
    let _creating = creating.lock().await;
    match manager.get(guild_id) {
        Some(call) => (call, false),
        None => (manager.get_or_insert(guild_id), true),
    }
}

/// The metadata stored on tracks enqueued by [SongbirdEngine].
fn track_info(handle: &TrackHandle) -> TrackInfo {
    TrackInfo::clone(&handle.data::<TrackInfo>())
}

#[async_trait]
impl AudioEngine for SongbirdEngine {
    #[instrument(skip(self), fields(guild = %request.guild_id, query = %request.query))]
    async fn play(&self, request: PlayRequest) -> Result<Option<QueueHandle>, EngineError> {
        let Some(info) = youtube::resolve(&request.query).await? else {
            tracing::info!("No results.");
            return Ok(None);
        };
        let Some(url) = info.url.clone() else {
            tracing::warn!("Result has no url: {info:?}");
            return Ok(None);
        };

        let call = self.join(request.guild_id, request.voice_channel).await?;

        let input = YoutubeDl::new(self.http_client.clone(), url);
        let track = Track::new_with_data(input.into(), Arc::new(info.clone()));

        let (handle, position) = {
            let mut call = call.lock().await;
            let handle = call.enqueue(track).await;
            (handle, call.queue().len())
        };

        NowPlaying::new(self.ctx.http.clone(), request.text_channel, info.clone())
            .register(&handle)?;

        tracing::info!(
            "Queued {} at position {position} for {}",
            info.title(),
            request.member
        );
        Ok(Some(QueueHandle {
            position,
            title: info.title().to_string(),
        }))
    }

    #[instrument(skip(self))]
    async fn skip(&self, guild_id: GuildId) -> Result<Option<TrackInfo>, EngineError> {
        let call = self.call(guild_id)?;
        let call = call.lock().await;

        let queue = call.queue();
        let Some(current) = queue.current() else {
            return Ok(None);
        };

        let info = track_info(&current);
        tracing::info!("Skipping {}", info.title());
        queue.skip()?;
        Ok(Some(info))
    }

    #[instrument(skip(self))]
    async fn stop(&self, guild_id: GuildId) -> Result<(), EngineError> {
        {
            let call = self.call(guild_id)?;
            let call = call.lock().await;
            tracing::info!("Stopping the queue.");
            call.queue().stop();
        }
        // Dropping the call also drops its global events.
        self.manager.remove(guild_id).await?;
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn queue(&self, guild_id: GuildId) -> Result<Vec<TrackInfo>, EngineError> {
        let call = self.call(guild_id)?;
        let call = call.lock().await;
        Ok(call.queue().current_queue().iter().map(track_info).collect())
    }
}
