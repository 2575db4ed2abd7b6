//! Music commands, backed by the [AudioEngine](crate::audio::AudioEngine).

pub mod play;
pub mod queue;
pub mod skip;
pub mod stop;

use crate::error::BotError;
use crate::error::EngineError;
use crate::error::UserError;

/// Not being in a call is the user's problem, everything else is ours.
fn engine_error(error: EngineError) -> BotError {
    match error {
        EngineError::NotConnected => UserError::NoCall.into(),
        other => other.into(),
    }
}
