/**
 * Hub Subscriptions
 *
 * A subscription is one receiver on the hub plus an optional event-kind
 * filter. Screens on a cooperative UI loop drain it with `try_next`; screens
 * driven by a tokio task await `next`, or turn it into a `Stream`.
 *
 * # Connection Management
 *
 * - Dropping the subscription unsubscribes it
 * - Lagged receivers log the number of skipped envelopes and keep going
 * - A closed hub ends the subscription
 */

use crate::shared::event::{Broadcast, EventKind};
use futures_util::{Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

/// Filtered receiver on the content hub
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<Broadcast>,
    filter: Option<Vec<EventKind>>,
    skipped: u64,
}

impl Subscription {
    pub(crate) fn new(rx: broadcast::Receiver<Broadcast>, kinds: &[EventKind]) -> Self {
        let filter = if kinds.is_empty() {
            None
        } else {
            Some(kinds.to_vec())
        };
        Self {
            rx,
            filter,
            skipped: 0,
        }
    }

    /// Whether envelopes of this kind pass the filter
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.filter
            .as_ref()
            .map_or(true, |kinds| kinds.contains(&kind))
    }

    /// Envelopes lost to lag so far
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Next buffered envelope that passes the filter, without waiting
    pub fn try_next(&mut self) -> Option<Broadcast> {
        loop {
            match self.rx.try_recv() {
                Ok(envelope) => {
                    if self.accepts(envelope.event.kind()) {
                        return Some(envelope);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("[Hub] Receiver lagged, skipped {} events", skipped);
                    self.skipped += skipped;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Wait for the next envelope that passes the filter
    ///
    /// Returns `None` once the hub and all its clones are gone.
    pub async fn next(&mut self) -> Option<Broadcast> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) => {
                    if self.accepts(envelope.event.kind()) {
                        return Some(envelope);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Hub] Receiver lagged, skipped {} events", skipped);
                    self.skipped += skipped;
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("[Hub] Channel closed, ending subscription");
                    return None;
                }
            }
        }
    }

    /// Convert into a stream of filtered envelopes
    pub fn into_stream(self) -> impl Stream<Item = Broadcast> + Send + 'static {
        let filter = self.filter;
        BroadcastStream::new(self.rx).filter_map(move |item| {
            let envelope = match item {
                Ok(envelope) => {
                    let wanted = filter
                        .as_ref()
                        .map_or(true, |kinds| kinds.contains(&envelope.event.kind()));
                    wanted.then_some(envelope)
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!("[Hub] Stream lagged, skipped {} events", skipped);
                    None
                }
            };
            async move { envelope }
        })
    }
}
