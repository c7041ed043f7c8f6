use std::fmt::{self, Debug};
use std::sync::{Arc, Weak};

use tokio::sync::oneshot;
use tracing::Instrument;

use crate::mailbox::{Mailbox, MailboxParts};
use crate::scheduler::run_actor;
use crate::{ActorGoneError, Context, Message};

/// Handle to an actor.
///
/// The actor keeps running as long as at least one handle is alive.
/// Timers scheduled by the actor itself don't keep it alive.
pub struct Actor<S> {
    mailbox: Arc<Mailbox<S>>,
}

impl<S: Send + 'static> Actor<S> {
    /// Spawns a new actor with the specified state and an optional label.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(state: S, label: Option<&str>) -> Self {
        let MailboxParts {
            mailbox,
            envelope_rx,
            kill_rx,
        } = Mailbox::new();
        let mailbox = Arc::new(mailbox);
        tokio::spawn(
            run_actor(Arc::downgrade(&mailbox), state, envelope_rx, kill_rx)
                .instrument(debug_span!("actor", label = label)),
        );
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn from_mailbox(mailbox: Arc<Mailbox<S>>) -> Self {
        Self { mailbox }
    }

    #[inline]
    pub(crate) fn downgrade(&self) -> Weak<Mailbox<S>> {
        Arc::downgrade(&self.mailbox)
    }

    /// Sends a message to the actor without waiting for it to be handled.
    #[inline]
    pub fn send<M: Message<S> + 'static>(
        &self,
        msg: M,
    ) -> Result<(), ActorGoneError> {
        self.mailbox.send(Box::new(msg))
    }

    /// Runs `f` on the actor's state and waits for its return value.
    ///
    /// `f` runs as a regular message, so it observes every message sent
    /// before it and none sent after it.
    pub async fn ask<R, F>(&self, f: F) -> Result<R, ActorGoneError>
    where
        F: FnOnce(&mut S, &mut Context<'_, S>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Ask { f, reply_tx })?;
        reply_rx.await.map_err(|_| ActorGoneError)
    }

    /// Attempts to kill the actor.
    ///
    /// The actor stops handling further messages soon and all of its
    /// pending timers are aborted.
    #[inline]
    pub fn try_kill(&self) {
        self.mailbox.try_kill();
    }
}

impl<S> Clone for Actor<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            mailbox: Arc::clone(&self.mailbox),
        }
    }
}

struct Ask<F, R> {
    f: F,
    reply_tx: oneshot::Sender<R>,
}

impl<F, R> Debug for Ask<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ask").finish_non_exhaustive()
    }
}

impl<S, F, R> Message<S> for Ask<F, R>
where
    F: FnOnce(&mut S, &mut Context<'_, S>) -> R + Send + 'static,
    R: Send + 'static,
{
    fn handle(self, state: &mut S, ctx: &mut Context<'_, S>) {
        let value = (self.f)(state, ctx);
        if self.reply_tx.send(value).is_err() {
            trace!("asker went away before the reply");
        }
    }
}
