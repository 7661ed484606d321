// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Explicit publish-subscribe channel for query status transitions.
//!
//! Subscribers receive every value published after they subscribe, in
//! publish order, over an unbounded channel. Publishing never blocks and
//! never observes subscriber failures; a receiver that was dropped is
//! pruned on the next publish.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Handle identifying one subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A broadcast point for values of type `T`.
#[derive(Debug)]
pub struct Observable<T> {
    subscribers: Mutex<HashMap<u64, mpsc::UnboundedSender<T>>>,
    next_id: AtomicU64,
}

impl<T: Clone> Observable<T> {
    /// Creates an observable with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a new subscriber.
    ///
    /// Returns the id to pass to [`unsubscribe`](Self::unsubscribe) and the
    /// receiving end of the subscription. Dropping the receiver is also a
    /// valid way to end a subscription.
    pub fn subscribe(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<T>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().insert(id, tx);
        (SubscriptionId(id), rx)
    }

    /// Remove a subscriber; its receiver gets nothing further.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.lock().remove(&id.0);
    }

    /// Deliver `value` to every live subscriber.
    pub fn publish(&self, value: T) {
        self.subscribers
            .lock()
            .retain(|_, tx| tx.send(value.clone()).is_ok());
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

impl<T: Clone> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}
