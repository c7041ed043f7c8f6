use std::sync::Weak;

use tokio::select;
use tokio::sync::{mpsc, watch};

use crate::context::Timers;
use crate::mailbox::{Envelope, Mailbox};
use crate::{Actor, Context};

pub(crate) async fn run_actor<S: Send + 'static>(
    mailbox: Weak<Mailbox<S>>,
    mut state: S,
    mut envelope_rx: mpsc::UnboundedReceiver<Envelope<S>>,
    mut kill_rx: watch::Receiver<bool>,
) {
    debug!("started");
    let mut timers = Timers::default();
    loop {
        let envelope = select! {
            biased;

            _ = kill_rx.changed() => {
                break;
            }
            envelope = envelope_rx.recv() => {
                let Some(envelope) = envelope else {
                    break;
                };
                envelope
            }
        };
        trace!("received: {envelope:?}");

        let msg = match envelope {
            Envelope::Direct(msg) => msg,
            Envelope::Timer(id, msg) => {
                if !timers.finish(id) {
                    trace!("timer {id:?} was cancelled, discard the message");
                    continue;
                }
                msg
            }
        };

        let Some(mailbox) = mailbox.upgrade() else {
            warn!("last mailbox has been dropped, discard the message");
            break;
        };
        let handle = Actor::from_mailbox(mailbox);

        let proc_span = trace_span!("proc msg");
        proc_span.in_scope(|| {
            let mut ctx = Context::new(&handle, &mut timers);
            msg.handle_box(&mut state, &mut ctx);
            trace!("finished");
        });
    }
    timers.abort_all();
    debug!("will terminate");
}
