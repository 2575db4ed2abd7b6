//! Commands about the bot itself.

pub mod help;
pub mod ping;
pub mod prefix;
