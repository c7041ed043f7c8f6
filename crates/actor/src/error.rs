use std::error::Error;
use std::fmt;

/// Returned when a message is sent to an actor whose run loop has
/// already stopped, or when the actor stopped before answering.
pub struct ActorGoneError;

impl fmt::Debug for ActorGoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorGoneError").finish()
    }
}

impl fmt::Display for ActorGoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the actor has stopped".fmt(f)
    }
}

impl Error for ActorGoneError {}
