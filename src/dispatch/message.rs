//! Prefix commands, e.g. `angela^ping` or `xx!play foo bar`.

use tracing::instrument;

use crate::data::Data;
use crate::log::report_failure;
use crate::log::Surface;
use crate::platform::MessageContext;
use crate::registry::PrefixContext;

/// Reply for slash commands that have no prefix handler.
pub const NO_PREFIX_SUPPORT: &str = "❌ This command has no prefix support.";

/// Reply when a prefix handler fails for a reason that isn't the user's.
pub const COMMAND_FAILED: &str = "❌ An error occurred executing the command.";

/// A command name and its arguments, parsed from a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Lowercased first token.
    pub name: String,
    pub args: Vec<String>,
}

/// Parse `content` if it starts with `prefix`.
/// The rest is split on whitespace, the first token being the command name.
pub fn parse_invocation(content: &str, prefix: &str) -> Option<Invocation> {
    let mut tokens = content.strip_prefix(prefix)?.split_whitespace();
    let name = tokens.next()?.to_lowercase();
    let args = tokens.map(str::to_string).collect();
    Some(Invocation { name, args })
}

/// What happened to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Not a command for this bot.
    Ignored,
    /// The command exists but only as a slash command.
    Unsupported { command: String },
    /// The handler ran to completion.
    Handled { command: String },
    /// The handler failed, the user was told.
    Failed { command: String },
}

/// Run the prefix command in `message`, if there is one.
#[instrument(level = "debug", skip_all, fields(author = %message.author_id(), guild = ?message.guild_id()))]
pub async fn dispatch(data: &Data, message: &dyn MessageContext) -> MessageOutcome {
    // Guild messages from humans only.
    let Some(guild_id) = message.guild_id() else {
        return MessageOutcome::Ignored;
    };
    if message.author_is_bot() {
        return MessageOutcome::Ignored;
    }

    let prefix = data.prefixes.resolve(guild_id);
    let Some(invocation) = parse_invocation(message.content(), prefix) else {
        return MessageOutcome::Ignored;
    };

    let Some(command) = data.registry.get(&invocation.name) else {
        tracing::debug!("Unknown command '{}'", invocation.name);
        return MessageOutcome::Ignored;
    };
    let name = command.name().to_string();

    let Some(handler) = command.prefix_handler() else {
        tracing::debug!("'{name}' has no prefix handler.");
        if let Err(e) = message.reply(NO_PREFIX_SUPPORT).await {
            tracing::error!("Failed to reply to '{name}': {e}");
        }
        return MessageOutcome::Unsupported { command: name };
    };

    tracing::info!("Started '{name}' prefix command from {}.", message.author_id());
    let ctx = PrefixContext {
        message,
        args: &invocation.args,
        prefix,
        data,
    };

    match handler.run(&ctx).await {
        Ok(()) => {
            tracing::info!("Finished '{name}' prefix command.");
            MessageOutcome::Handled { command: name }
        }
        Err(e) => {
            report_failure(Surface::Message(message), e, &name, COMMAND_FAILED).await;
            MessageOutcome::Failed { command: name }
        }
    }
}
