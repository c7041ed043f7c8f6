//! User sends and the simulated assistant replies that follow them.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;

use ops_agent_model::{ModelSelector, ReplyComposer};

use crate::conversation::{ConversationId, Message, Role, title_preview};
use crate::store::ConversationStore;

/// How long the simulated assistant takes to answer.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1500);

/// How replies within one conversation relate to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReplyPolicy {
    /// Every message gets its own reply timer right away. Replies to
    /// quick successive messages may be in flight at the same time.
    #[default]
    Concurrent,
    /// At most one reply per conversation is in flight. Later messages
    /// wait until the previous reply has landed.
    Serialized,
}

/// Identifies one deferred reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyTicket(u64);

/// A reply that must be completed once its delay has elapsed.
///
/// The target conversation is captured when the user message is sent,
/// so the reply lands there even if another conversation is active by
/// then.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingReply {
    ticket: ReplyTicket,
    target: ConversationId,
    prompt: String,
}

impl PendingReply {
    /// Returns the ticket of this reply.
    #[inline]
    pub fn ticket(&self) -> ReplyTicket {
        self.ticket
    }

    /// Returns the conversation the reply goes to.
    #[inline]
    pub fn target(&self) -> &ConversationId {
        &self.target
    }

    /// Returns the user text being answered.
    #[inline]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// The result of [`MessageExchange::send`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// The text was blank; nothing changed.
    Rejected,
    /// The user message was appended and its reply must be scheduled.
    Scheduled {
        /// The appended user message.
        message: Message,
        /// The reply to schedule.
        reply: PendingReply,
    },
    /// The user message was appended; its reply waits for an earlier
    /// reply in the same conversation.
    Queued {
        /// The appended user message.
        message: Message,
    },
}

impl SendOutcome {
    /// Returns `true` unless the send was rejected.
    #[inline]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SendOutcome::Rejected)
    }
}

/// The result of [`MessageExchange::complete`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplyOutcome {
    /// The appended assistant message, unless the reply was dropped.
    pub message: Option<Message>,
    /// A queued reply of the same conversation that must be scheduled
    /// now.
    pub next: Option<PendingReply>,
}

/// Appends user messages and the assistant replies that answer them.
pub struct MessageExchange {
    composer: Box<dyn ReplyComposer>,
    policy: ReplyPolicy,
    next_ticket: u64,
    in_flight: BTreeMap<ReplyTicket, ConversationId>,
    queued: HashMap<ConversationId, VecDeque<String>>,
}

impl MessageExchange {
    /// Creates an exchange composing replies with `composer`.
    #[inline]
    pub fn new<C: ReplyComposer + 'static>(
        composer: C,
        policy: ReplyPolicy,
    ) -> Self {
        Self::with_boxed_composer(Box::new(composer), policy)
    }

    #[inline]
    pub(crate) fn with_boxed_composer(
        composer: Box<dyn ReplyComposer>,
        policy: ReplyPolicy,
    ) -> Self {
        Self {
            composer,
            policy,
            next_ticket: 1,
            in_flight: BTreeMap::new(),
            queued: HashMap::new(),
        }
    }

    /// Returns the reply policy.
    #[inline]
    pub fn policy(&self) -> ReplyPolicy {
        self.policy
    }

    /// Sends `text` as a user message into the active conversation.
    ///
    /// Blank text is rejected. The text itself is stored untrimmed. The
    /// first message sent into a conversation still carrying the default
    /// title also renames it after the text.
    pub fn send(&mut self, store: &mut ConversationStore, text: &str) -> SendOutcome {
        if text.trim().is_empty() {
            trace!("rejected blank message");
            return SendOutcome::Rejected;
        }

        store.ensure_active();
        let Some(target) = store.active_id().cloned() else {
            return SendOutcome::Rejected;
        };
        let Some(message) = store.append(&target, Role::User, text.to_owned())
        else {
            return SendOutcome::Rejected;
        };
        if let Some(conversation) = store.get_mut(&target) {
            if conversation.has_default_title() {
                conversation.set_title(title_preview(text));
            }
        }

        if self.policy == ReplyPolicy::Serialized && self.has_in_flight(&target) {
            debug!("reply for {target} queued behind an earlier one");
            self.queued
                .entry(target)
                .or_default()
                .push_back(text.to_owned());
            return SendOutcome::Queued { message };
        }

        let reply = self.issue(target, text.to_owned());
        SendOutcome::Scheduled { message, reply }
    }

    /// Appends the assistant reply for `pending` to its target
    /// conversation, labelled with the model selected right now.
    ///
    /// The reply is dropped if its ticket is no longer in flight or the
    /// target conversation has been deleted.
    pub fn complete(
        &mut self,
        store: &mut ConversationStore,
        selector: &ModelSelector,
        pending: PendingReply,
    ) -> ReplyOutcome {
        let PendingReply {
            ticket,
            target,
            prompt,
        } = pending;
        if self.in_flight.remove(&ticket).is_none() {
            trace!("reply {ticket:?} is no longer in flight");
            return ReplyOutcome::default();
        }

        let content = self.composer.compose(selector.current(), &prompt);
        let message = store.append(&target, Role::Assistant, content);
        if message.is_none() {
            warn!("conversation {target} is gone, dropping reply {ticket:?}");
        }

        let next = match self.policy {
            ReplyPolicy::Concurrent => None,
            ReplyPolicy::Serialized => self.dequeue(target),
        };
        ReplyOutcome { message, next }
    }

    /// Forgets every reply meant for `conversation`, typically because
    /// it was deleted. Returns the tickets that were in flight.
    pub fn forget(&mut self, conversation: &ConversationId) -> Vec<ReplyTicket> {
        self.queued.remove(conversation);
        let tickets: Vec<ReplyTicket> = self
            .in_flight
            .iter()
            .filter(|(_, target)| *target == conversation)
            .map(|(ticket, _)| *ticket)
            .collect();
        for ticket in &tickets {
            self.in_flight.remove(ticket);
        }
        if !tickets.is_empty() {
            debug!("forgot {} reply(ies) for {conversation}", tickets.len());
        }
        tickets
    }

    /// Returns the number of replies not yet appended, in flight or
    /// queued, for `conversation`.
    pub fn pending_for(&self, conversation: &ConversationId) -> usize {
        let in_flight = self
            .in_flight
            .values()
            .filter(|target| *target == conversation)
            .count();
        let queued = self.queued.get(conversation).map_or(0, VecDeque::len);
        in_flight + queued
    }

    /// Returns `true` if no reply is in flight or queued.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    fn has_in_flight(&self, conversation: &ConversationId) -> bool {
        self.in_flight.values().any(|target| target == conversation)
    }

    fn dequeue(&mut self, target: ConversationId) -> Option<PendingReply> {
        let queue = self.queued.get_mut(&target)?;
        let prompt = queue.pop_front();
        if queue.is_empty() {
            self.queued.remove(&target);
        }
        prompt.map(|prompt| self.issue(target, prompt))
    }

    fn issue(&mut self, target: ConversationId, prompt: String) -> PendingReply {
        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(ticket, target.clone());
        PendingReply {
            ticket,
            target,
            prompt,
        }
    }
}
