//! Routes platform events to command handlers.
//!
//! No error escapes a dispatcher. Failures are logged and answered with a
//! short message, and the outcome is returned for the caller to log.

pub mod interaction;
pub mod message;

pub use interaction::InteractionOutcome;
pub use message::MessageOutcome;
