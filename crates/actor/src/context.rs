use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::{Actor, Message};

/// Identifies a deferred message scheduled with [`Context::defer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timers owned by one actor's run loop.
#[derive(Default)]
pub(crate) struct Timers {
    next_id: u64,
    pending: HashMap<TimerId, JoinHandle<()>>,
}

impl Timers {
    /// Forgets a timer whose message just arrived. Returns `false` if
    /// the timer was cancelled in the meantime.
    #[inline]
    pub fn finish(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    pub fn abort_all(&mut self) {
        for (_, task) in self.pending.drain() {
            task.abort();
        }
    }
}

/// Execution context passed to every message handler.
pub struct Context<'a, S> {
    handle: &'a Actor<S>,
    timers: &'a mut Timers,
}

impl<'a, S: Send + 'static> Context<'a, S> {
    #[inline]
    pub(crate) fn new(handle: &'a Actor<S>, timers: &'a mut Timers) -> Self {
        Self { handle, timers }
    }

    /// Returns the handle of the running actor.
    #[inline]
    pub fn handle(&self) -> &Actor<S> {
        self.handle
    }

    /// Delivers `msg` to this actor after `delay`.
    ///
    /// The timer is one-shot. It is aborted when cancelled or when the
    /// actor stops, whichever comes first.
    pub fn defer<M: Message<S> + 'static>(
        &mut self,
        delay: Duration,
        msg: M,
    ) -> TimerId {
        let id = TimerId(self.timers.next_id);
        self.timers.next_id += 1;

        let mailbox = self.handle.downgrade();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            let Some(mailbox) = mailbox.upgrade() else {
                trace!("timer {id:?} expired after the actor was dropped");
                return;
            };
            mailbox.deliver_timer(id, Box::new(msg)).ok();
        });
        self.timers.pending.insert(id, task);
        trace!("scheduled timer {id:?} in {delay:?}");
        id
    }

    /// Cancels a pending timer. Returns `false` if it has already fired
    /// or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.timers.pending.remove(&id) {
            Some(task) => {
                task.abort();
                trace!("cancelled timer {id:?}");
                true
            }
            None => false,
        }
    }

    /// Returns the number of timers that have not fired yet.
    #[inline]
    pub fn pending_timers(&self) -> usize {
        self.timers.pending.len()
    }
}
