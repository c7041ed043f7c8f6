use std::fmt::{self, Debug};

use tokio::sync::{mpsc, watch};

use crate::{ActorGoneError, Context, TimerId};

/// Helper trait for handling boxed messages.
pub trait BoxMessage<S>: Send + Debug + 'static {
    fn handle_box(self: Box<Self>, state: &mut S, ctx: &mut Context<'_, S>);
}

/// The message that an actor can handle.
pub trait Message<S>: BoxMessage<S> {
    /// Handles the message with mutable access to the actor's state.
    ///
    /// The context gives access to the actor's own handle and lets the
    /// handler schedule deferred messages.
    fn handle(self, state: &mut S, ctx: &mut Context<'_, S>);
}

impl<S, M: Message<S>> BoxMessage<S> for M {
    #[inline]
    fn handle_box(self: Box<Self>, state: &mut S, ctx: &mut Context<'_, S>) {
        (*self).handle(state, ctx)
    }
}

impl<S, M: Message<S> + ?Sized> Message<S> for Box<M> {
    #[inline]
    fn handle(self, state: &mut S, ctx: &mut Context<'_, S>) {
        self.handle_box(state, ctx)
    }
}

/// What travels through the mailbox channel.
pub(crate) enum Envelope<S> {
    /// A message sent directly through a handle.
    Direct(Box<dyn Message<S>>),
    /// A message delivered by an expired timer.
    Timer(TimerId, Box<dyn Message<S>>),
}

impl<S> Debug for Envelope<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Envelope::Direct(msg) => f.debug_tuple("Direct").field(msg).finish(),
            Envelope::Timer(id, msg) => {
                f.debug_tuple("Timer").field(id).field(msg).finish()
            }
        }
    }
}

pub(crate) struct MailboxParts<S> {
    pub mailbox: Mailbox<S>,
    pub envelope_rx: mpsc::UnboundedReceiver<Envelope<S>>,
    pub kill_rx: watch::Receiver<bool>,
}

pub(crate) struct Mailbox<S> {
    envelope_tx: mpsc::UnboundedSender<Envelope<S>>,
    kill_tx: watch::Sender<bool>,
}

impl<S: Send + 'static> Mailbox<S> {
    #[inline]
    pub fn new() -> MailboxParts<S> {
        let (envelope_tx, envelope_rx) = mpsc::unbounded_channel();
        let (kill_tx, kill_rx) = watch::channel(false);
        MailboxParts {
            mailbox: Mailbox {
                envelope_tx,
                kill_tx,
            },
            envelope_rx,
            kill_rx,
        }
    }

    #[inline]
    pub fn send(&self, msg: Box<dyn Message<S>>) -> Result<(), ActorGoneError> {
        self.envelope_tx
            .send(Envelope::Direct(msg))
            .map_err(|_| ActorGoneError)
    }

    #[inline]
    pub fn deliver_timer(
        &self,
        id: TimerId,
        msg: Box<dyn Message<S>>,
    ) -> Result<(), ActorGoneError> {
        self.envelope_tx
            .send(Envelope::Timer(id, msg))
            .map_err(|_| ActorGoneError)
    }

    #[inline]
    pub fn try_kill(&self) {
        self.kill_tx.send(true).ok();
    }
}
