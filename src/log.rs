//! Logging functionality and error reporting.
//! The logging library of choice is [tracing].

use tracing::debug;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::error::BotError;
use crate::platform::InteractionContext;
use crate::platform::MessageContext;
use crate::setup::Config;

/// The name of this crate, used to set filter target.
const THIS_CRATE: &str = env!("CARGO_CRATE_NAME");

/// Setup format layers, tracing subscribers, and installs tracing.
/// The returned guard must be held for as long as file logs should be written.
pub fn install_tracing(config: &Config) -> Option<WorkerGuard> {
    // Uses local time.
    let timer = fmt::time::ChronoLocal::rfc_3339();
    let debug = config.console_debug();

    // Set which traces are tracked.
    // By default, all INFO traces and above are shown.
    let target = if debug {
        Targets::new()
            .with_default(LevelFilter::INFO)
            .with_target(THIS_CRATE, LevelFilter::DEBUG)
    } else {
        Targets::new().with_default(LevelFilter::INFO)
    };

    // Compose the layer that prints traces to stdout.
    // File and line numbers are only useful while debugging.
    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_file(debug)
        .with_level(true)
        .with_line_number(debug)
        .with_target(true)
        .with_timer(timer.clone())
        .pretty()
        .with_filter(target.clone());

    // Compose the layer that writes logs and get a guard for the writer.
    let (log_layer, guard) = if config.logs_enabled() {
        // Put file logs in `log_dir` directory as "{THIS_CRATE}.log.{TIMESTAMP}" on an hourly basis.
        let prefix_format = format!("{THIS_CRATE}.log");
        let appender = tracing_appender::rolling::hourly(config.log_dir(), prefix_format);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_file(debug)
            .with_level(true)
            .with_line_number(debug)
            .with_target(true)
            .with_timer(timer)
            .with_writer(writer)
            .compact()
            .with_filter(target);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // Add all the layers and initialize them.
    tracing_subscriber::registry()
        .with(console_layer)
        .with(log_layer)
        .init();

    guard
}

/// Where the user-facing part of a [Response] is sent.
#[derive(Clone, Copy)]
pub enum Surface<'a> {
    /// Reply to a text message.
    Message(&'a dyn MessageContext),
    /// Ephemeral reply to an interaction.
    Ephemeral(&'a dyn InteractionContext),
    /// Follow-up to an acknowledged interaction.
    FollowUp(&'a dyn InteractionContext),
}

impl Surface<'_> {
    /// Send `content`, only logging if that fails.
    async fn send(&self, content: &str) {
        let result = match self {
            Surface::Message(msg) => msg.reply(content).await,
            Surface::Ephemeral(interaction) => interaction.reply_ephemeral(content).await,
            Surface::FollowUp(interaction) => interaction.follow_up(content).await,
        };
        if let Err(e) = result {
            error!("Failed to send error reply. {e}")
        }
    }
}

/// Structured response to errors.
/// Always logs as at least [debug level](tracing::debug), but is upgraded to
/// [error level](tracing::error) if `is_error` is set.
#[derive(bon::Builder)]
#[builder(on(String, into))]
pub struct Response<'a> {
    /// Where the reply goes.
    surface: Surface<'a>,
    /// The reason for this reply, usually the error causing the response.
    #[builder(into)]
    source: BotError,
    /// Optional reply to user.
    reply: Option<String>,
    /// Additional information to log
    add_info: Option<String>,
    /// Set to `true` to log as error.
    #[builder(default = false)]
    is_error: bool,
}

impl Response<'_> {
    /// Execute the response
    pub async fn send(&self) {
        let log_message = {
            let source = &self.source;
            // Map `None` to "" otherwise format it to be appended to another string.
            let add_info = self
                .add_info
                .as_ref()
                .map_or(String::new(), |s| format!("| {s}"));
            format!("{source} {add_info}")
        };

        if self.is_error {
            error!("{log_message}");
        } else {
            debug!("{log_message}");
        }

        if let Some(ref reply) = self.reply {
            self.surface.send(reply).await;
        }
    }
}

/// Report a failed command.
/// [UserError](crate::error::UserError)s are shown verbatim and are not logged as errors,
/// anything else is logged as an error and the user sees `generic`.
pub async fn report_failure(surface: Surface<'_>, error: BotError, command: &str, generic: &str) {
    let response = match error {
        BotError::UserError(user_error) => Response::builder()
            .surface(surface)
            .reply(user_error.to_string())
            .source(user_error)
            .add_info(format!("in '{command}'"))
            .build(),
        other => Response::builder()
            .surface(surface)
            .reply(generic)
            .source(other)
            .add_info(format!("in '{command}'"))
            .is_error(true)
            .build(),
    };
    response.send().await
}
