//! Subject/observer plumbing over std channels.
//!
//! The buffer and the settings store both publish changes through a
//! [`Subject`]. Subscribers hold the receiving half; dropped receivers are
//! pruned on the next emission.

use std::sync::mpsc::{self, Receiver, Sender};

/// A value publisher with any number of channel subscribers.
pub struct Subject<T: Clone> {
    subscribers: Vec<Sender<T>>,
}

impl<T: Clone> Subject<T> {
    pub const fn new() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }

    /// Register a subscriber. Only values emitted after this call are delivered.
    pub fn subscribe(&mut self) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Register a subscriber and deliver `current` to it right away.
    pub fn subscribe_with(&mut self, current: T) -> Receiver<T> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(current);
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `value` to every live subscriber.
    pub fn emit(&mut self, value: &T) {
        self.subscribers.retain(|tx| tx.send(value.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Drain a receiver and keep only the most recent value.
pub fn latest<T>(rx: &Receiver<T>) -> Option<T> {
    let mut last = None;
    while let Ok(value) = rx.try_recv() {
        last = Some(value);
    }
    last
}
