//! Ring presenter for the terminal host
//!
//! Fired reminders are pushed onto an unbounded channel so the timer task
//! never waits on the terminal. The main loop drains the channel and prints.

use serde::Serialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};
use watertime_core::RingPresenter;

/// One fired reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ring {
    pub title: String,
    pub body: String,
}

/// Presenter that logs every ring and forwards it to a receiver.
pub struct ChannelRingPresenter {
    sender: UnboundedSender<Ring>,
}

impl ChannelRingPresenter {
    /// Presenter plus the receiver fired reminders arrive on.
    pub fn new() -> (Self, UnboundedReceiver<Ring>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl RingPresenter for ChannelRingPresenter {
    fn on_fire(&self, title: &str, body: &str) {
        info!(title, body, "ring");
        let ring = Ring { title: title.to_string(), body: body.to_string() };
        if self.sender.send(ring).is_err() {
            debug!("Ring receiver closed; dropping ring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rings_reach_the_receiver() {
        let (presenter, mut receiver) = ChannelRingPresenter::new();

        presenter.on_fire("Time to drink water 💧", "Reminder at 08:00");

        let ring = receiver.try_recv().unwrap();
        assert_eq!(ring.body, "Reminder at 08:00");
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (presenter, receiver) = ChannelRingPresenter::new();
        drop(receiver);

        presenter.on_fire("title", "body");
    }
}
