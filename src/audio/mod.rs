//! Music playback.
//!
//! Commands talk to an [AudioEngine]. The real one is [SongbirdEngine], which
//! resolves queries with yt-dlp and plays them through [songbird].

pub mod engine;
pub mod events;
pub mod youtube;

use std::fmt::Display;
use std::fmt::Write;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::ChannelId;
use serenity::all::GuildId;
use serenity::all::UserId;

use crate::error::EngineError;

pub use engine::SongbirdEngine;

/// Discord's limit on message content, in characters.
pub const MESSAGE_LIMIT: usize = 2000;

/// What to play and for whom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRequest {
    pub guild_id: GuildId,
    /// The member's voice channel, joined if the bot isn't there yet.
    pub voice_channel: ChannelId,
    /// Song name or URL.
    pub query: String,
    /// Where "now playing" announcements go.
    pub text_channel: ChannelId,
    /// Who asked.
    pub member: UserId,
}

/// A track that was added to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueHandle {
    /// 1-based position in the queue, 1 means it plays now.
    pub position: usize,
    pub title: String,
}

/// Metadata of a queued track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub duration: Option<Duration>,
    /// The uploader's channel name.
    pub channel: Option<String>,
    /// Url to source
    pub url: Option<String>,
}

impl TrackInfo {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("<MISSING TITLE>")
    }
}

impl Display for TrackInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.title();
        let channel = self.channel.as_deref().unwrap_or_default();
        let duration = self.duration.map(|d| format_duration(&d)).unwrap_or_default();

        match &self.url {
            Some(url) => write!(f, "[{title} {duration} {channel}]({url})"),
            None => write!(f, "{title} {duration} {channel}"),
        }
    }
}

/// Plays audio in voice channels.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Resolve the query and add it to the guild's queue, joining voice if needed.
    /// `Ok(None)` means nothing matched the query.
    async fn play(&self, request: PlayRequest) -> Result<Option<QueueHandle>, EngineError>;

    /// Skip the current track, returning it. `Ok(None)` if nothing was playing.
    async fn skip(&self, guild_id: GuildId) -> Result<Option<TrackInfo>, EngineError>;

    /// Clear the queue and leave the voice channel.
    async fn stop(&self, guild_id: GuildId) -> Result<(), EngineError>;

    /// Tracks in the queue, the playing one first.
    async fn queue(&self, guild_id: GuildId) -> Result<Vec<TrackInfo>, EngineError>;
}

/// Helper function to format a duration.
pub fn format_duration(dur: &Duration) -> String {
    let total_secs = dur.as_secs();
    let total_mins = total_secs / 60;

    let hours = total_mins / 60;
    let mins = total_mins % 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("[{hours:02}:{mins:02}:{secs:02}]")
    } else {
        format!("[{mins:02}:{secs:02}]")
    }
}

/// Numbered listing of `tracks`, cut off before [MESSAGE_LIMIT].
pub fn display_queue(tracks: &[TrackInfo]) -> String {
    let mut buffer = String::new();
    let mut length = 0;
    for (num, track) in tracks.iter().enumerate() {
        let next_line = if num == 0 {
            format!("`Now.` {track}\n")
        } else {
            format!("`{num}.` {track}\n")
        };

        let line_length = next_line.chars().count();
        if length + line_length > MESSAGE_LIMIT {
            break;
        }
        length += line_length;
        // Writing to a String can't fail.
        let _ = write!(buffer, "{next_line}");
    }
    buffer
}
