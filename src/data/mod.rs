//! This module contains everything relating to [Data].

pub mod prefixes;

use std::sync::Arc;

use crate::audio::AudioEngine;
use crate::registry::CommandRegistry;
pub use prefixes::PrefixStore;

/// State shared by every event, built once when the bot is first ready.
/// Nothing in here changes afterwards.
pub struct Data {
    /// Per-guild prefixes.
    pub prefixes: PrefixStore,
    /// Loaded commands.
    pub registry: CommandRegistry,
    /// Plays music, internally synchronized.
    pub engine: Arc<dyn AudioEngine>,
}

impl Data {
    pub fn new(prefixes: PrefixStore, registry: CommandRegistry, engine: Arc<dyn AudioEngine>) -> Self {
        Self {
            prefixes,
            registry,
            engine,
        }
    }
}
