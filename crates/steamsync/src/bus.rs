//! Fan-out of [`Event`]s to subscribers.
//!
//! Each subscriber owns an unbounded queue, so [`EventBus::publish`]
//! never blocks the synchronizer and a slow consumer only grows its own
//! backlog. Events reach every subscriber in publish order. A subscriber
//! only sees events published after it subscribed.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc;

use crate::Event;

/// Sending half held by the bus for one subscriber.
type EventSender = mpsc::UnboundedSender<Event>;

/// The publish side of the event channel.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<EventSender>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        EventStream { rx }
    }

    /// Delivers `event` to every live subscriber.
    ///
    /// Subscribers whose stream was dropped are removed.
    pub fn publish(&self, event: Event) {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let pruned = before - subscribers.len();
        if pruned > 0 {
            tracing::debug!(pruned, "dropped closed event subscribers");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EventSender>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// EventStream
// ---------------------------------------------------------------------------

/// The receive side of one subscription.
///
/// Dropping the stream unsubscribes it on the next publish.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventStream {
    /// Waits for the next event.
    ///
    /// Returns `None` once the bus is gone and the backlog is empty.
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Returns the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }

    /// Takes every event queued so far.
    pub fn drain(&mut self) -> Vec<Event> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
