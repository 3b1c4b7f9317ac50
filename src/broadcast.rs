//! Change notification fan-out. Mutating handlers publish after the store
//! confirms a write; WebSocket connections subscribe per party and treat
//! any message as a cue to re-fetch.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::mpsc;

use crate::models::event::EventType;

/// What changed. Spelled snake_case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    DishAdded,
    VoteCast,
    VotingReset,
}

/// A live subscription: read from `rx`, hand `id` back to
/// [`ChangeHub::unsubscribe`] when done.
pub struct Subscription {
    pub id: u64,
    pub rx: mpsc::UnboundedReceiver<String>,
}

/// Fan-out hub keyed by party. Registration and removal are explicit;
/// subscribers whose receiver hung up are also pruned on the next publish.
#[derive(Default)]
pub struct ChangeHub {
    next_id: AtomicU64,
    subscribers: RwLock<HashMap<EventType, Vec<(u64, mpsc::UnboundedSender<String>)>>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, party: EventType) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut map = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        map.entry(party).or_default().push((id, tx));
        Subscription { id, rx }
    }

    pub fn unsubscribe(&self, party: EventType, id: u64) {
        let mut map = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        if let Some(subs) = map.get_mut(&party) {
            subs.retain(|(sub_id, _)| *sub_id != id);
            if subs.is_empty() {
                map.remove(&party);
            }
        }
    }

    /// Notify every subscriber of `party` that something changed.
    pub fn publish(&self, party: EventType, change: Change) {
        let msg = serde_json::json!({
            "type": change,
            "party": party,
        })
        .to_string();

        let mut map = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        if let Some(subs) = map.get_mut(&party) {
            subs.retain(|(_, tx)| tx.send(msg.clone()).is_ok());
        }
    }

    pub fn subscriber_count(&self, party: EventType) -> usize {
        let map = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
        map.get(&party).map_or(0, Vec::len)
    }
}
