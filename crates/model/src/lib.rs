//! Model catalog and reply composition.
//!
//! The operations agent doesn't run any real inference. A "model" here
//! is only an entry of a static catalog that the user can select, and
//! whose name labels the simulated assistant replies.
//!
//! Types in this crate hold no session state. The session engine in
//! `ops-agent-core` owns a [`ModelSelector`] and a [`ReplyComposer`].

#![deny(missing_docs)]

mod catalog;
mod composer;
mod error;
mod selector;

pub use catalog::*;
pub use composer::*;
pub use error::*;
pub use selector::*;
