/**
 * Content Change Broadcasting
 *
 * The hub is an explicit, cloneable event bus handed to every screen at
 * construction. It wraps one `tokio::sync::broadcast` channel, so every
 * subscriber receives its own copy of each envelope in publish order.
 *
 * Nothing here is global: tests build a hub per case and drop it at the end.
 */

use crate::realtime::subscription::Subscription;
use crate::shared::config::SyncConfig;
use crate::shared::event::{Broadcast, ChangeEvent, EventKind, ScreenId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Process-wide publish/subscribe hub for content changes
#[derive(Debug, Clone)]
pub struct ContentHub {
    tx: broadcast::Sender<Broadcast>,
    sequence: Arc<AtomicU64>,
}

impl ContentHub {
    /// Create a hub buffering `capacity` envelopes per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.hub_capacity)
    }

    /// Publish an event on behalf of `origin`
    ///
    /// Returns the number of subscribers that received it (0 if none).
    pub fn publish(&self, origin: ScreenId, event: ChangeEvent) -> usize {
        self.send(origin, event, false)
    }

    /// Publish an event that reverts a rejected optimistic change
    pub fn publish_compensating(&self, origin: ScreenId, event: ChangeEvent) -> usize {
        self.send(origin, event, true)
    }

    fn send(&self, origin: ScreenId, event: ChangeEvent, compensating: bool) -> usize {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let kind = event.kind();
        let envelope = Broadcast {
            origin,
            sequence,
            sent_at: chrono::Utc::now(),
            compensating,
            event,
        };

        match self.tx.send(envelope) {
            Ok(subscriber_count) => {
                tracing::debug!(
                    "[Hub] #{} {:?} from {} broadcast to {} subscribers",
                    sequence,
                    kind,
                    origin,
                    subscriber_count
                );
                subscriber_count
            }
            Err(_) => {
                // No subscribers, that's okay
                tracing::debug!("[Hub] #{} {:?} from {} had no subscribers", sequence, kind, origin);
                0
            }
        }
    }

    /// Subscribe to the given event kinds; an empty slice means every kind
    pub fn subscribe(&self, kinds: &[EventKind]) -> Subscription {
        Subscription::new(self.tx.subscribe(), kinds)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Sequence number of the most recent publish (0 before the first)
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl Default for ContentHub {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}
