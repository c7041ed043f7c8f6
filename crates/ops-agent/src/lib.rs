//! The operations agent: a chat front-end over a conversation history
//! with simulated assistant replies.
//!
//! The crate includes a CLI tool for using in the terminal. It can also
//! be used as a library, with [`SessionBuilder`] setting up a session
//! preloaded with the operations models and mock history.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod command;
pub mod config;
pub mod export;
pub mod seed;
mod session;

pub use ops_agent_core::{Error, Session, Snapshot};
pub use session::SessionBuilder;

/// Re-exports of [`ops_agent_core`] crate.
pub mod core {
    pub use ops_agent_core::*;
}
