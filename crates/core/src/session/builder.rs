use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ops_agent_model::{
    CannedReply, DEFAULT_MODEL_ID, ModelCatalog, ModelSelector, ReplyComposer,
};

use super::Session;
use super::state::{OnIdle, OnReply, SessionState};
use crate::Error;
use crate::clock::{Clock, SystemClock};
use crate::conversation::{Conversation, ConversationId, Message};
use crate::exchange::{DEFAULT_REPLY_DELAY, MessageExchange, ReplyPolicy};
use crate::store::ConversationStore;

/// [`Session`] builder.
pub struct SessionBuilder {
    catalog: ModelCatalog,
    default_model: String,
    composer: Box<dyn ReplyComposer>,
    policy: ReplyPolicy,
    reply_delay: Duration,
    clock: Arc<dyn Clock>,
    conversations: Vec<Conversation>,
    on_reply: Option<OnReply>,
    on_idle: Option<OnIdle>,
}

impl SessionBuilder {
    /// Creates a builder with the built-in catalog, canned replies and
    /// the system clock.
    pub fn new() -> Self {
        Self {
            catalog: ModelCatalog::builtin(),
            default_model: DEFAULT_MODEL_ID.to_owned(),
            composer: Box::new(CannedReply::default()),
            policy: ReplyPolicy::default(),
            reply_delay: DEFAULT_REPLY_DELAY,
            clock: Arc::new(SystemClock),
            conversations: Vec::new(),
            on_reply: None,
            on_idle: None,
        }
    }

    /// Sets the catalog models are selected from.
    #[inline]
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the model selected when the session starts.
    #[inline]
    pub fn with_default_model<S: Into<String>>(mut self, id: S) -> Self {
        self.default_model = id.into();
        self
    }

    /// Sets how reply contents are produced.
    #[inline]
    pub fn with_composer<C: ReplyComposer + 'static>(mut self, composer: C) -> Self {
        self.composer = Box::new(composer);
        self
    }

    /// Sets the reply policy.
    #[inline]
    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets how long the simulated assistant takes to answer.
    #[inline]
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Sets the clock used for message timestamps and ids.
    #[inline]
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Starts the session with these conversations, in this order. The
    /// first one becomes active.
    ///
    /// Without any, the session starts with a single new conversation.
    #[inline]
    pub fn with_conversations(mut self, conversations: Vec<Conversation>) -> Self {
        self.conversations = conversations;
        self
    }

    /// Attaches a callback invoked whenever an assistant reply has been
    /// appended.
    #[inline]
    pub fn on_reply(
        mut self,
        on_reply: impl Fn(&ConversationId, &Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_reply = Some(Box::new(on_reply));
        self
    }

    /// Attaches a callback invoked when no reply is in flight anymore.
    #[inline]
    pub fn on_idle(mut self, on_idle: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds and starts the session.
    ///
    /// Must be called within a tokio runtime. Fails if the default model
    /// is not in the catalog.
    pub fn build(self) -> Result<Session, Error> {
        let Self {
            catalog,
            default_model,
            composer,
            policy,
            reply_delay,
            clock,
            conversations,
            on_reply,
            on_idle,
        } = self;

        let selector = ModelSelector::new(catalog, &default_model)?;
        let mut store = ConversationStore::with_conversations(clock, conversations);
        if store.ensure_active() {
            debug!("started without conversations, created one");
        }

        let state = SessionState {
            store,
            selector,
            exchange: MessageExchange::with_boxed_composer(composer, policy),
            reply_delay,
            timers: HashMap::new(),
            on_reply,
            on_idle,
        };
        Ok(Session::spawn(state))
    }
}

impl Default for SessionBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
