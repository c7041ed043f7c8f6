//! Conversation-related types.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Title given to every freshly created conversation.
pub const DEFAULT_TITLE: &str = "New conversation";

/// Activity label given to every freshly created conversation.
pub const JUST_NOW: &str = "Just now";

/// Number of characters of the first prompt used as an automatic title.
pub const TITLE_PREVIEW_CHARS: usize = 50;

/// Unique identifier of a conversation.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wraps an existing identifier.
    #[inline]
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ConversationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    #[inline]
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Unique identifier of a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wraps an existing identifier.
    #[inline]
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MessageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who wrote a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person using the agent.
    User,
    /// The (simulated) agent.
    Assistant,
}

/// A single message in a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    timestamp: String,
}

impl Message {
    /// Creates a message. `timestamp` is only used for display.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(
        id: MessageId,
        role: Role,
        content: S1,
        timestamp: S2,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Returns the message id.
    #[inline]
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns who wrote the message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of the message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the `HH:MM` wall-clock time at which the message was
    /// appended.
    #[inline]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

/// A named, ordered sequence of messages.
///
/// Messages are only ever appended; their order is the order in which
/// they were added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    title: String,
    last_activity: String,
    #[serde(default)]
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(
        id: ConversationId,
        title: S1,
        last_activity: S2,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            last_activity: last_activity.into(),
            messages: Vec::new(),
        }
    }

    /// Adds pre-existing messages, e.g. when seeding a store.
    #[inline]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Returns the conversation id.
    #[inline]
    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the display-only activity label, e.g. `2 hours ago`.
    #[inline]
    pub fn last_activity(&self) -> &str {
        &self.last_activity
    }

    /// Returns the messages in chronological order.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[inline]
    pub(crate) fn has_default_title(&self) -> bool {
        self.title == DEFAULT_TITLE
    }

    #[inline]
    pub(crate) fn set_title<S: Into<String>>(&mut self, title: S) {
        self.title = title.into();
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }
}

/// Builds the automatic title from the first prompt of a conversation.
///
/// The ellipsis is appended even when nothing was cut off.
pub(crate) fn title_preview(prompt: &str) -> String {
    let mut title: String = prompt.chars().take(TITLE_PREVIEW_CHARS).collect();
    title.push_str("...");
    title
}
