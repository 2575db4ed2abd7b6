//! Songbird event handlers.
//!
//! Currently the bot monitors for the following:
//! - On idle (alone for some time), the bot stops the queue and disconnects.
//! - On disconnect, the bot stops and deletes the queue.
//! - When a track starts, it is announced in the channel it was requested from.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::all::Context;
use serenity::all::Http;
use songbird::CoreEvent;
use songbird::Event;
use songbird::EventContext;
use songbird::EventHandler;
use songbird::TrackEvent;
use songbird::tracks::TrackHandle;

use super::engine::CallRef;
use super::TrackInfo;
use crate::error::EngineError;

/// How often [CheckIdle] looks for listeners.
pub const IDLE_CHECK: Duration = Duration::from_secs(300);

/// Register the global events of a freshly created call.
pub async fn register_global_events(call: &CallRef, ctx: &Context) {
    tracing::info!("Initializing global events.");

    let mut lock = call.lock().await;
    lock.add_global_event(Event::Periodic(IDLE_CHECK, None), CheckIdle::new(call, ctx));
    lock.add_global_event(
        Event::Core(CoreEvent::DriverDisconnect),
        DisconnectStop::new(call),
    );
}

/// Check if there are non-bot users in the call, if not then disconnect.
struct CheckIdle {
    /// The call to check.
    call: CallRef,
    /// Needed to find channels and guilds.
    ctx: Context,
}

impl CheckIdle {
    fn new(call: &CallRef, ctx: &Context) -> Self {
        Self {
            call: call.clone(),
            ctx: ctx.clone(),
        }
    }
}

#[async_trait]
impl EventHandler for CheckIdle {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        let mut call = self.call.lock().await;

        let Some(channel_id) = call.current_channel().map(|c| ChannelId::from(c.0)) else {
            // Not in a channel, nothing to watch.
            return None;
        };

        // Each `?` retries on the next tick.
        let channel = channel_id.to_channel(&self.ctx).await.ok()?;
        let guild = channel.guild()?;
        let members = guild.members(&self.ctx).ok()?;

        if members.iter().any(|m| !m.user.bot) {
            return None;
        }

        tracing::info!("Idle! Disconnecting from voice channel.");
        call.queue().stop();
        if let Err(e) = call.leave().await {
            tracing::warn!("Failed to leave idle channel: {e}");
        }
        None
    }
}

/// Stop and delete the queue when the driver disconnects.
struct DisconnectStop {
    /// Reference to the call that will be dropped.
    call: CallRef,
}

impl DisconnectStop {
    fn new(call: &CallRef) -> Self {
        Self { call: call.clone() }
    }
}

#[async_trait]
impl EventHandler for DisconnectStop {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        tracing::info!("Stopping on disconnect!");
        let call = self.call.lock().await;
        call.queue().stop();
        None
    }
}

/// Announce a track in the text channel it was requested from when it starts.
pub struct NowPlaying {
    http: Arc<Http>,
    channel: ChannelId,
    track: TrackInfo,
}

impl NowPlaying {
    pub fn new(http: Arc<Http>, channel: ChannelId, track: TrackInfo) -> Self {
        Self {
            http,
            channel,
            track,
        }
    }

    /// Attach to `handle`.
    pub fn register(self, handle: &TrackHandle) -> Result<(), EngineError> {
        handle.add_event(Event::Track(TrackEvent::Play), self)?;
        Ok(())
    }

    fn announcement(&self) -> String {
        format!("🎶 Now playing: {}", self.track)
    }
}

#[async_trait]
impl EventHandler for NowPlaying {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        tracing::debug!("Now playing {}", self.track.title());
        if let Err(e) = self.channel.say(&self.http, self.announcement()).await {
            tracing::warn!("Failed to announce track: {e}");
        }
        // Don't fire again if the track is paused and resumed.
        Some(Event::Cancel)
    }
}
