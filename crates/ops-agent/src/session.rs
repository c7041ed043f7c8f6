use std::time::Duration;

use ops_agent_core::{
    ConversationId, Error, Message, ReplyPolicy, Session,
    SessionBuilder as CoreSessionBuilder,
};
use ops_agent_model::ModelCatalog;

use crate::config::Config;
use crate::seed;

/// A session builder with the operations agent defaults: the built-in
/// model catalog, canned replies and the mock conversation history.
///
/// See [`Session`].
pub struct SessionBuilder {
    core_builder: CoreSessionBuilder,
    seeded: bool,
}

impl SessionBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        let core_builder =
            CoreSessionBuilder::new().with_catalog(ModelCatalog::builtin());
        Self {
            core_builder,
            seeded: true,
        }
    }

    /// Creates a builder with settings from `config`.
    #[inline]
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_reply_delay(config.reply_delay)
            .with_default_model(config.default_model.clone())
            .with_reply_policy(config.reply_policy)
    }

    /// Sets how long the simulated assistant takes to answer.
    #[inline]
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.core_builder = self.core_builder.with_reply_delay(delay);
        self
    }

    /// Sets the model selected when the session starts.
    #[inline]
    pub fn with_default_model<S: Into<String>>(mut self, id: S) -> Self {
        self.core_builder = self.core_builder.with_default_model(id);
        self
    }

    /// Sets the reply policy.
    #[inline]
    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.core_builder = self.core_builder.with_reply_policy(policy);
        self
    }

    /// Starts with a single empty conversation instead of the mock
    /// history.
    #[inline]
    pub fn without_seed(mut self) -> Self {
        self.seeded = false;
        self
    }

    /// Attaches a callback invoked whenever an assistant reply has been
    /// appended.
    #[inline]
    pub fn on_reply(
        mut self,
        on_reply: impl Fn(&ConversationId, &Message) + Send + Sync + 'static,
    ) -> Self {
        self.core_builder = self.core_builder.on_reply(on_reply);
        self
    }

    /// Attaches a callback invoked when no reply is in flight anymore.
    #[inline]
    pub fn on_idle(mut self, on_idle: impl Fn() + Send + Sync + 'static) -> Self {
        self.core_builder = self.core_builder.on_idle(on_idle);
        self
    }

    /// Builds and starts the session.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Result<Session, Error> {
        let Self {
            mut core_builder,
            seeded,
        } = self;
        if seeded {
            core_builder = core_builder.with_conversations(seed::conversations());
        }
        core_builder.build()
    }
}

impl Default for SessionBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ops_agent_core::Role;
    use tokio::time::sleep;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_starts_with_seed_history() {
        let session = SessionBuilder::new().build().unwrap();
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.conversations.len(), 3);
        assert_eq!(snapshot.active_id, Some("1".into()));
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.model.id, "operations-pro");
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_seed() {
        let session = SessionBuilder::new().without_seed().build().unwrap();
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.conversations.len(), 1);
        assert_eq!(snapshot.conversations[0].title, "New conversation");
        assert!(snapshot.messages.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_reaches_session() {
        let config = Config {
            default_model: "gpt-4o".to_owned(),
            reply_delay: Duration::from_millis(10),
            ..Config::default()
        };
        let session = SessionBuilder::from_config(&config).build().unwrap();
        assert_eq!(session.current_model().await.unwrap().name, "GPT-4o");

        assert!(session.send_message("Tìm đơn hàng").await.unwrap());
        sleep(Duration::from_millis(5)).await;
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.messages.len(), 3);
        assert_eq!(snapshot.pending_replies, 1);

        sleep(Duration::from_millis(10)).await;
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.messages.len(), 4);
        assert_eq!(snapshot.pending_replies, 0);
        let reply = &snapshot.messages[3];
        assert_eq!(reply.role(), Role::Assistant);
        assert!(reply.content().starts_with("[GPT-4o] "));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_default_model_fails() {
        let result = SessionBuilder::new().with_default_model("gpt-2").build();
        assert!(matches!(result, Err(Error::UnknownModel(_))));
    }
}
