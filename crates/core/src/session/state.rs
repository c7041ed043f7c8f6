use std::collections::HashMap;
use std::time::Duration;

use ops_agent_actor::{Context, Message as ActorMessage, TimerId};
use ops_agent_model::{ModelDescriptor, ModelSelector, UnknownModelError};

use super::{ConversationSummary, Snapshot};
use crate::conversation::{ConversationId, Message};
use crate::exchange::{MessageExchange, PendingReply, ReplyTicket, SendOutcome};
use crate::store::ConversationStore;

pub(crate) type OnReply = Box<dyn Fn(&ConversationId, &Message) + Send + Sync>;
pub(crate) type OnIdle = Box<dyn Fn() + Send + Sync>;

pub(crate) struct SessionState {
    pub(crate) store: ConversationStore,
    pub(crate) selector: ModelSelector,
    pub(crate) exchange: MessageExchange,
    pub(crate) reply_delay: Duration,
    pub(crate) timers: HashMap<ReplyTicket, TimerId>,
    pub(crate) on_reply: Option<OnReply>,
    pub(crate) on_idle: Option<OnIdle>,
}

type Ctx<'a> = Context<'a, SessionState>;

impl SessionState {
    pub fn send_message(&mut self, text: &str, ctx: &mut Ctx<'_>) -> bool {
        let outcome = self.exchange.send(&mut self.store, text);
        let accepted = outcome.is_accepted();
        if let SendOutcome::Scheduled { reply, .. } = outcome {
            self.schedule(reply, ctx);
        }
        accepted
    }

    pub fn delete_conversation(
        &mut self,
        id: &ConversationId,
        ctx: &mut Ctx<'_>,
    ) -> bool {
        if !self.store.delete_conversation(id) {
            return false;
        }

        let tickets = self.exchange.forget(id);
        if tickets.is_empty() {
            return true;
        }
        for ticket in tickets {
            if let Some(timer) = self.timers.remove(&ticket) {
                ctx.cancel(timer);
            }
        }
        if self.exchange.is_idle() {
            self.notify_idle();
        }
        true
    }

    pub fn select_model(
        &mut self,
        id: &str,
    ) -> Result<ModelDescriptor, UnknownModelError> {
        let model = self.selector.select(id)?;
        debug!("selected model {}", model.id);
        Ok(model.clone())
    }

    pub fn snapshot(&self) -> Snapshot {
        let conversations = self
            .store
            .conversations()
            .iter()
            .map(ConversationSummary::from)
            .collect();
        let active_id = self.store.active_id().cloned();
        let pending_replies = active_id
            .as_ref()
            .map_or(0, |id| self.exchange.pending_for(id));
        Snapshot {
            conversations,
            active_id,
            messages: self.store.active_messages().to_vec(),
            model: self.selector.current().clone(),
            pending_replies,
        }
    }

    fn schedule(&mut self, reply: PendingReply, ctx: &mut Ctx<'_>) {
        let ticket = reply.ticket();
        let timer = ctx.defer(self.reply_delay, ReplyDue(reply));
        self.timers.insert(ticket, timer);
    }

    fn complete_reply(&mut self, reply: PendingReply, ctx: &mut Ctx<'_>) {
        self.timers.remove(&reply.ticket());
        let target = reply.target().clone();

        let outcome = self.exchange.complete(&mut self.store, &self.selector, reply);
        if let (Some(msg), Some(on_reply)) = (&outcome.message, &self.on_reply) {
            on_reply(&target, msg);
        }
        if let Some(next) = outcome.next {
            self.schedule(next, ctx);
        }
        if self.exchange.is_idle() {
            self.notify_idle();
        }
    }

    fn notify_idle(&self) {
        trace!("no reply in flight");
        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }
}

#[derive(Debug)]
struct ReplyDue(PendingReply);

impl ActorMessage<SessionState> for ReplyDue {
    fn handle(self, state: &mut SessionState, ctx: &mut Ctx<'_>) {
        state.complete_reply(self.0, ctx);
    }
}
