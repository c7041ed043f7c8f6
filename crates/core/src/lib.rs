//! Session engine of the operations agent: conversations, the message
//! exchange with its simulated replies, and model selection.
//!
//! The synchronous building blocks ([`ConversationStore`],
//! [`MessageExchange`]) can be used on their own. [`Session`] wires them
//! into an actor that schedules replies on the tokio timer.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod clock;
pub mod conversation;
mod error;
pub mod exchange;
mod session;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use conversation::{Conversation, ConversationId, Message, MessageId, Role};
pub use error::Error;
pub use exchange::{MessageExchange, ReplyPolicy};
pub use session::{ConversationSummary, Session, SessionBuilder, Snapshot};
pub use store::ConversationStore;

/// Re-exports of [`ops_agent_model`] crate.
pub mod model {
    pub use ops_agent_model::*;
}
