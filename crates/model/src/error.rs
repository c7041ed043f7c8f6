use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Returned when a model id is not part of the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnknownModelError {
    id: String,
}

impl UnknownModelError {
    #[inline]
    pub(crate) fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }

    /// Returns the rejected model id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Display for UnknownModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model: {}", self.id)
    }
}

impl Error for UnknownModelError {}
