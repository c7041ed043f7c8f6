mod builder;
mod state;
#[cfg(test)]
mod tests;

use ops_agent_actor::Actor;
use ops_agent_model::{ModelCatalog, ModelDescriptor};

use crate::Error;
use crate::conversation::{Conversation, ConversationId, Message};
pub use builder::SessionBuilder;
use state::SessionState;

/// A chat session: the conversation list, the active conversation, the
/// selected model and the replies in flight.
///
/// The state lives in an actor, so every operation is applied as one
/// atomic step in the order the calls were made, and replies arrive in
/// the background once their delay has elapsed. Cloning a session gives
/// another handle to the same state.
///
/// Use [`SessionBuilder`] to create one.
#[derive(Clone)]
pub struct Session {
    handle: Actor<SessionState>,
}

/// A conversation as listed in a sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversationSummary {
    /// The conversation id.
    pub id: ConversationId,
    /// The current title.
    pub title: String,
    /// The display-only activity label.
    pub last_activity: String,
    /// How many messages the conversation holds.
    pub message_count: usize,
}

impl From<&Conversation> for ConversationSummary {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id().clone(),
            title: conversation.title().to_owned(),
            last_activity: conversation.last_activity().to_owned(),
            message_count: conversation.messages().len(),
        }
    }
}

/// Everything a front-end needs to render the session.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// All conversations, most recently created first.
    pub conversations: Vec<ConversationSummary>,
    /// The active conversation.
    pub active_id: Option<ConversationId>,
    /// Messages of the active conversation.
    pub messages: Vec<Message>,
    /// The selected model.
    pub model: ModelDescriptor,
    /// Replies still to come in the active conversation.
    pub pending_replies: usize,
}

impl Session {
    #[inline]
    fn spawn(state: SessionState) -> Self {
        let handle = Actor::spawn(state, Some("session"));
        Self { handle }
    }

    /// Creates a new conversation, makes it active and returns its id.
    pub async fn create_conversation(&self) -> Result<ConversationId, Error> {
        let id = self
            .handle
            .ask(|state, _| state.store.create_conversation())
            .await?;
        Ok(id)
    }

    /// Makes the conversation `id` active.
    ///
    /// Returns `false` if there is no such conversation.
    pub async fn select_conversation(
        &self,
        id: ConversationId,
    ) -> Result<bool, Error> {
        let selected = self
            .handle
            .ask(move |state, _| state.store.select_conversation(&id).is_some())
            .await?;
        Ok(selected)
    }

    /// Renames the conversation `id`.
    ///
    /// Returns `false` if the title is blank or there is no such
    /// conversation.
    pub async fn rename_conversation<S: Into<String>>(
        &self,
        id: ConversationId,
        title: S,
    ) -> Result<bool, Error> {
        let title = title.into();
        let renamed = self
            .handle
            .ask(move |state, _| state.store.rename_conversation(&id, &title))
            .await?;
        Ok(renamed)
    }

    /// Deletes the conversation `id` together with its messages and any
    /// reply still to come for it.
    ///
    /// Returns `false` if there is no such conversation.
    pub async fn delete_conversation(
        &self,
        id: ConversationId,
    ) -> Result<bool, Error> {
        let deleted = self
            .handle
            .ask(move |state, ctx| state.delete_conversation(&id, ctx))
            .await?;
        Ok(deleted)
    }

    /// Sends a user message to the active conversation and schedules the
    /// assistant reply.
    ///
    /// Returns `false` if the text is blank.
    pub async fn send_message<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<bool, Error> {
        let text = text.into();
        let sent = self
            .handle
            .ask(move |state, ctx| state.send_message(&text, ctx))
            .await?;
        Ok(sent)
    }

    /// Selects the model used to label subsequent replies, including
    /// those already in flight.
    pub async fn select_model<S: Into<String>>(
        &self,
        id: S,
    ) -> Result<ModelDescriptor, Error> {
        let id = id.into();
        let selected = self
            .handle
            .ask(move |state, _| state.select_model(&id))
            .await?;
        Ok(selected?)
    }

    /// Returns the selected model.
    pub async fn current_model(&self) -> Result<ModelDescriptor, Error> {
        let model = self
            .handle
            .ask(|state, _| state.selector.current().clone())
            .await?;
        Ok(model)
    }

    /// Returns the catalog models can be selected from.
    pub async fn models(&self) -> Result<ModelCatalog, Error> {
        let catalog = self
            .handle
            .ask(|state, _| state.selector.catalog().clone())
            .await?;
        Ok(catalog)
    }

    /// Returns a copy of the conversation `id`.
    pub async fn conversation(
        &self,
        id: ConversationId,
    ) -> Result<Option<Conversation>, Error> {
        let conversation = self
            .handle
            .ask(move |state, _| state.store.get(&id).cloned())
            .await?;
        Ok(conversation)
    }

    /// Returns a copy of the state a front-end renders.
    pub async fn snapshot(&self) -> Result<Snapshot, Error> {
        let snapshot = self.handle.ask(|state, _| state.snapshot()).await?;
        Ok(snapshot)
    }

    /// Stops the session. Replies still in flight are discarded and
    /// further calls fail with [`Error::SessionClosed`].
    #[inline]
    pub fn shutdown(&self) {
        self.handle.try_kill();
    }
}
