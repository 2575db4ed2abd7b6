//! Bot commands.
//!
//! Each command lives in `<category>/<name>.rs` and exposes a `module` loader
//! registering what it supports.

pub mod general;
pub mod music;

use serenity::all::GuildId;

use crate::error::UserError;
use crate::registry::CommandSource;
use crate::registry::ModuleEntry;

/// The commands compiled into the bot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl CommandSource for Builtin {
    fn modules(&self) -> Vec<ModuleEntry> {
        vec![
            ModuleEntry::new("general", "help.rs", general::help::module),
            ModuleEntry::new("general", "ping.rs", general::ping::module),
            ModuleEntry::new("general", "prefix.rs", general::prefix::module),
            ModuleEntry::new("music", "play.rs", music::play::module),
            ModuleEntry::new("music", "queue.rs", music::queue::module),
            ModuleEntry::new("music", "skip.rs", music::skip::module),
            ModuleEntry::new("music", "stop.rs", music::stop::module),
        ]
    }
}

/// Most commands only make sense in a server.
fn guild_only(guild: Option<GuildId>) -> Result<GuildId, UserError> {
    guild.ok_or(UserError::NotInGuild)
}
