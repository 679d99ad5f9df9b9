//! Publication of registry and valuation notifications.

use estate_types::{EstateEvent, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A published event with its position in the global order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Monotonic, gap-free across the node's lifetime.
    pub sequence: u64,
    pub at: Timestamp,
    pub event: EstateEvent,
}

pub type EventListener = Box<dyn Fn(&EventEnvelope) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline while the node holds its write lock, so they
/// observe events in commit order; keep handlers fast.
pub struct EventBus {
    listeners: Vec<EventListener>,
    next_sequence: u64,
    recent: VecDeque<EventEnvelope>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            listeners: Vec::new(),
            next_sequence: 0,
            recent: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn subscribe(&mut self, listener: EventListener) {
        self.listeners.push(listener);
    }

    /// Stamp, retain and fan out a batch of events.
    pub fn publish(&mut self, events: Vec<EstateEvent>, at: Timestamp) {
        for event in events {
            let envelope = EventEnvelope {
                sequence: self.next_sequence,
                at,
                event,
            };
            self.next_sequence += 1;
            for listener in &self.listeners {
                listener(&envelope);
            }
            if self.capacity > 0 {
                if self.recent.len() == self.capacity {
                    self.recent.pop_front();
                }
                self.recent.push_back(envelope);
            }
        }
    }

    /// Up to `limit` most recent events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<EventEnvelope> {
        let skip = self.recent.len().saturating_sub(limit);
        self.recent.iter().skip(skip).cloned().collect()
    }

    pub fn published(&self) -> u64 {
        self.next_sequence
    }
}
