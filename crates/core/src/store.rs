//! The conversation list and the active conversation.

use std::sync::Arc;

use crate::clock::{Clock, IdGenerator, display_time};
use crate::conversation::{
    Conversation, ConversationId, DEFAULT_TITLE, JUST_NOW, Message, MessageId,
    Role,
};

/// Owns every conversation of a session and tracks which one is active.
///
/// Conversations are ordered most-recently-created first. Operations
/// referring to an unknown conversation, or carrying blank input, are
/// no-ops and report so through their return value.
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: Option<ConversationId>,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
}

impl ConversationStore {
    /// Creates an empty store.
    ///
    /// An empty store has no active conversation until
    /// [`ensure_active`](Self::ensure_active) or
    /// [`create_conversation`](Self::create_conversation) is called.
    #[inline]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            conversations: Vec::new(),
            active: None,
            clock,
            ids: IdGenerator::default(),
        }
    }

    /// Creates a store holding `conversations` in the given order, with
    /// the first one active.
    ///
    /// Conversations whose id repeats an earlier one are dropped.
    pub fn with_conversations(
        clock: Arc<dyn Clock>,
        conversations: Vec<Conversation>,
    ) -> Self {
        let mut store = Self::new(clock);
        for conversation in conversations {
            if store.get(conversation.id()).is_some() {
                warn!("dropping duplicated conversation {}", conversation.id());
                continue;
            }
            store.conversations.push(conversation);
        }
        store.active = store.conversations.first().map(|c| c.id().clone());
        store
    }

    /// Makes sure a conversation is active, creating one if the store is
    /// empty. Returns `true` if a conversation was created.
    pub fn ensure_active(&mut self) -> bool {
        if self.active.is_some() {
            return false;
        }
        if let Some(first) = self.conversations.first() {
            self.active = Some(first.id().clone());
            return false;
        }
        self.create_conversation();
        true
    }

    /// Creates an empty conversation at the front of the list and makes
    /// it active.
    pub fn create_conversation(&mut self) -> ConversationId {
        // Seeded conversations may carry ids from any scheme.
        let id = loop {
            let id = ConversationId::new(self.ids.next_id(self.clock.now()));
            if self.position(&id).is_none() {
                break id;
            }
        };
        let conversation = Conversation::new(id.clone(), DEFAULT_TITLE, JUST_NOW);
        self.conversations.insert(0, conversation);
        self.active = Some(id.clone());
        debug!("created conversation {id}");
        id
    }

    /// Makes the conversation `id` active and returns its messages.
    ///
    /// Returns `None` and leaves the state unchanged if there is no such
    /// conversation.
    pub fn select_conversation(
        &mut self,
        id: &ConversationId,
    ) -> Option<&[Message]> {
        let index = self.position(id)?;
        self.active = Some(id.clone());
        trace!("selected conversation {id}");
        Some(self.conversations[index].messages())
    }

    /// Renames the conversation `id` to the trimmed `title`.
    ///
    /// Returns `false` if the title is blank or there is no such
    /// conversation.
    pub fn rename_conversation(&mut self, id: &ConversationId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(conversation) = self.get_mut(id) else {
            return false;
        };
        conversation.set_title(title);
        debug!("renamed conversation {id}");
        true
    }

    /// Removes the conversation `id` and its messages.
    ///
    /// When the active conversation is removed, the first remaining one
    /// becomes active, or a new one is created if none is left. Returns
    /// `false` if there is no such conversation.
    pub fn delete_conversation(&mut self, id: &ConversationId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.conversations.remove(index);
        debug!("deleted conversation {id}");

        if self.active.as_ref() == Some(id) {
            match self.conversations.first() {
                Some(first) => self.active = Some(first.id().clone()),
                None => {
                    self.active = None;
                    self.create_conversation();
                }
            }
        }
        true
    }

    /// Appends a message to the conversation `target`, which doesn't
    /// need to be the active one.
    ///
    /// Returns the appended message, or `None` if there is no such
    /// conversation.
    pub fn append(
        &mut self,
        target: &ConversationId,
        role: Role,
        content: String,
    ) -> Option<Message> {
        let index = self.position(target)?;
        let now = self.clock.now();
        let msg = Message::new(
            MessageId::new(self.ids.next_id(now)),
            role,
            content,
            display_time(now),
        );
        self.conversations[index].push(msg.clone());
        trace!("appended {role:?} message {} to {target}", msg.id());
        Some(msg)
    }

    /// Returns every conversation, most recently created first.
    #[inline]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Returns the id of the active conversation.
    #[inline]
    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    /// Returns the active conversation.
    #[inline]
    pub fn active(&self) -> Option<&Conversation> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    /// Returns the messages of the active conversation, which is what a
    /// front-end displays.
    #[inline]
    pub fn active_messages(&self) -> &[Message] {
        self.active().map(Conversation::messages).unwrap_or_default()
    }

    /// Looks up a conversation.
    #[inline]
    pub fn get(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    #[inline]
    pub(crate) fn get_mut(
        &mut self,
        id: &ConversationId,
    ) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id() == id)
    }

    /// Returns the number of conversations.
    #[inline]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Returns `true` if there are no conversations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    #[inline]
    fn position(&self, id: &ConversationId) -> Option<usize> {
        self.conversations.iter().position(|c| c.id() == id)
    }
}
