use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use ops_agent_actor::ActorGoneError;
use ops_agent_model::UnknownModelError;

/// Errors returned by [`Session`](crate::Session) operations.
///
/// Blank input and unknown conversation ids are not errors: those
/// operations simply report that nothing changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The session has been shut down.
    SessionClosed,
    /// The requested model is not in the catalog.
    UnknownModel(UnknownModelError),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::SessionClosed => write!(f, "the session has been closed"),
            Error::UnknownModel(err) => Display::fmt(err, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::SessionClosed => None,
            Error::UnknownModel(err) => Some(err),
        }
    }
}

impl From<ActorGoneError> for Error {
    #[inline]
    fn from(_: ActorGoneError) -> Self {
        Error::SessionClosed
    }
}

impl From<UnknownModelError> for Error {
    #[inline]
    fn from(err: UnknownModelError) -> Self {
        Error::UnknownModel(err)
    }
}
