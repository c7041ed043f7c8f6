//! A lightweight single-threaded actor runtime with deferred delivery.
//!
//! Every actor owns its state exclusively and handles one message at a
//! time, so each handler is an atomic step from the outside. Handlers
//! can schedule messages to themselves with [`Context::defer`], which
//! is how timed behavior is expressed without shared locks.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod context;
mod error;
mod handle;
mod mailbox;
mod scheduler;

pub use context::{Context, TimerId};
pub use error::ActorGoneError;
pub use handle::Actor;
pub use mailbox::Message;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::sleep;

    use super::*;

    #[derive(Default)]
    struct Counter {
        value: u32,
        fired: Vec<u32>,
    }

    #[derive(Debug)]
    struct Add(u32);

    impl Message<Counter> for Add {
        fn handle(self, state: &mut Counter, _ctx: &mut Context<'_, Counter>) {
            state.value += self.0;
        }
    }

    #[derive(Debug)]
    struct Fire(u32);

    impl Message<Counter> for Fire {
        fn handle(self, state: &mut Counter, _ctx: &mut Context<'_, Counter>) {
            state.fired.push(self.0);
        }
    }

    #[tokio::test]
    async fn test_send_and_ask() {
        let actor = Actor::spawn(Counter::default(), None);
        actor.send(Add(40)).unwrap();
        actor.send(Add(2)).unwrap();

        let value = actor.ask(|state, _| state.value).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_delivery() {
        let actor = Actor::spawn(Counter::default(), Some("timers"));
        actor
            .ask(|_, ctx| {
                ctx.defer(Duration::from_millis(200), Fire(2));
                ctx.defer(Duration::from_millis(100), Fire(1));
            })
            .await
            .unwrap();

        sleep(Duration::from_millis(50)).await;
        let fired = actor.ask(|state, _| state.fired.clone()).await.unwrap();
        assert!(fired.is_empty());

        sleep(Duration::from_millis(200)).await;
        let (fired, pending) = actor
            .ask(|state, ctx| (state.fired.clone(), ctx.pending_timers()))
            .await
            .unwrap();
        assert_eq!(fired, vec![1, 2]);
        assert_eq!(pending, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_timer() {
        let actor = Actor::spawn(Counter::default(), None);
        let (cancelled, cancelled_again) = actor
            .ask(|_, ctx| {
                let id = ctx.defer(Duration::from_millis(100), Fire(1));
                ctx.defer(Duration::from_millis(100), Fire(2));
                (ctx.cancel(id), ctx.cancel(id))
            })
            .await
            .unwrap();
        assert!(cancelled);
        assert!(!cancelled_again);

        sleep(Duration::from_millis(150)).await;
        let fired = actor.ask(|state, _| state.fired.clone()).await.unwrap();
        assert_eq!(fired, vec![2]);
    }

    #[tokio::test]
    async fn test_killed_actor_rejects_asks() {
        let actor = Actor::spawn(Counter::default(), None);
        actor.try_kill();
        // Give the run loop a chance to observe the kill signal.
        tokio::task::yield_now().await;

        let result = actor.ask(|state, _| state.value).await;
        assert!(result.is_err());
    }
}
