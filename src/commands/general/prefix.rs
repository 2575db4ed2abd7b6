//! Implements the `prefix` prefix command, showing the prefix in use.

use async_trait::async_trait;

use crate::error::BotError;
use crate::error::LoadError;
use crate::registry::CommandModule;
use crate::registry::PrefixContext;
use crate::registry::PrefixHandler;

pub fn module() -> Result<CommandModule, LoadError> {
    Ok(CommandModule::new().prefix(Prefix))
}

struct Prefix;

#[async_trait]
impl PrefixHandler for Prefix {
    async fn run(&self, ctx: &PrefixContext<'_>) -> Result<(), BotError> {
        let default = ctx.data.prefixes.default_prefix();
        let reply = if ctx.prefix == default {
            format!("My prefix here is `{}`.", ctx.prefix)
        } else {
            format!("My prefix here is `{}` (default `{default}`).", ctx.prefix)
        };
        ctx.message.reply(&reply).await
    }
}
