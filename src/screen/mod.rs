//! Screens
//!
//! A [`Screen`] is one independent view of content: a home feed, a profile,
//! a search result list. Each screen owns its store exclusively and stays
//! consistent with the others only through the hub:
//!
//! 1. a gesture mutates the local store optimistically,
//! 2. the change is broadcast,
//! 3. every other screen replays it on its own store when it pumps,
//! 4. the originating screen recognises the echo and skips it.
//!
//! All mutation happens through `&mut Screen`, so a screen driven from
//! several tasks needs a single owner (for example a task fed by a channel).

pub mod echo;
pub mod reconcile;
pub mod store;

pub use echo::EchoSuppressor;
pub use reconcile::reconcile;
pub use store::{Applied, FeedPosition, FeedStore, PageLoad};

use crate::offline::optimistic::{Intent, OptimisticLedger, PendingAction};
use crate::realtime::{ContentHub, Subscription};
use crate::shared::config::SyncConfig;
use crate::shared::content::{Author, ContentItem, ContentKey};
use crate::shared::error::{ServiceError, SyncError};
use crate::shared::event::{Broadcast, ChangeEvent, EventKind, ScreenId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// What happened to one received envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// This screen's own change coming back
    Echo,
    /// Applied; these feeds need a refresh
    Applied(Vec<String>),
    /// Nothing held by this screen changed
    Unchanged,
}

/// A live screen and its local copies of content
#[derive(Debug)]
pub struct Screen {
    id: ScreenId,
    name: String,
    store: FeedStore,
    hub: ContentHub,
    subscription: Subscription,
    suppressor: EchoSuppressor,
    ledger: OptimisticLedger,
    dirty: BTreeSet<String>,
    pending_ttl: Duration,
}

impl Screen {
    /// Create a screen listening to every event kind
    pub fn new(name: impl Into<String>, hub: &ContentHub, config: &SyncConfig) -> Self {
        Self::with_kinds(name, hub, config, &[])
    }

    /// Create a screen listening to the given event kinds only
    pub fn with_kinds(
        name: impl Into<String>,
        hub: &ContentHub,
        config: &SyncConfig,
        kinds: &[EventKind],
    ) -> Self {
        let id = ScreenId::new();
        let name = name.into();
        tracing::debug!("[Screen] {} ({}) subscribed", name, id);
        Self {
            id,
            name,
            store: FeedStore::new(),
            hub: hub.clone(),
            subscription: hub.subscribe(kinds),
            suppressor: EchoSuppressor::new(id, config.echo_policy),
            ledger: OptimisticLedger::new(),
            dirty: BTreeSet::new(),
            pending_ttl: config.pending_ttl(),
        }
    }

    pub fn id(&self) -> ScreenId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &FeedStore {
        &self.store
    }

    /// Show a freshly fetched first page in `feed`
    pub fn load_feed(&mut self, feed: &str, items: impl IntoIterator<Item = ContentItem>) {
        let load = self.store.replace_feed(feed, items);
        self.mark_dirty(load.evicted);
        self.dirty.insert(feed.to_string());
    }

    /// Append the next fetched page to `feed`
    pub fn append_page(&mut self, feed: &str, items: impl IntoIterator<Item = ContentItem>) -> usize {
        let load = self.store.append_page(feed, items);
        if load.appended > 0 {
            self.dirty.insert(feed.to_string());
        }
        self.mark_dirty(load.evicted);
        load.appended
    }

    pub fn close_feed(&mut self, feed: &str) -> bool {
        self.dirty.remove(feed);
        self.store.drop_feed(feed)
    }

    pub fn cache_author(&mut self, author: Author) {
        self.store.upsert_author(author);
    }

    /// Like or unlike the item
    ///
    /// The returned action carries the new state for the backend.
    pub fn toggle_like(&mut self, key: &ContentKey) -> Result<PendingAction, SyncError> {
        let liked = self.held(key)?.liked;
        self.act(PendingAction::new(key.clone(), Intent::Like(!liked)))
    }

    /// Bookmark or remove the bookmark
    pub fn toggle_bookmark(&mut self, key: &ContentKey) -> Result<PendingAction, SyncError> {
        let bookmarked = self.held(key)?.bookmarked;
        self.act(PendingAction::new(key.clone(), Intent::Bookmark(!bookmarked)))
    }

    /// Delete the viewer's own item; it disappears here right away
    pub fn delete(&mut self, key: &ContentKey) -> Result<PendingAction, SyncError> {
        self.held(key)?;
        self.act(PendingAction::new(key.clone(), Intent::Delete))
    }

    /// Apply a change that started on this screen and announce it
    ///
    /// Used for changes with no backend round trip modelled here: comment
    /// counts, case revisions, solving, profile edits.
    pub fn publish(&mut self, event: ChangeEvent) -> Result<(), SyncError> {
        let feeds = reconcile(&mut self.store, &event)?;
        self.mark_dirty(feeds);
        self.broadcast(event, false);
        Ok(())
    }

    fn held(&self, key: &ContentKey) -> Result<&ContentItem, SyncError> {
        self.store
            .get(key)
            .ok_or_else(|| SyncError::not_found(key.clone()))
    }

    fn act(&mut self, action: PendingAction) -> Result<PendingAction, SyncError> {
        let event = action.event();
        let feeds = reconcile(&mut self.store, &event)?;
        self.mark_dirty(feeds);
        let action = self.ledger.record(action);
        self.broadcast(event, false);
        Ok(action)
    }

    fn broadcast(&mut self, event: ChangeEvent, compensating: bool) {
        self.suppressor.mark_outgoing();
        if compensating {
            self.hub.publish_compensating(self.id, event);
        } else {
            self.hub.publish(self.id, event);
        }
    }

    /// Record the backend outcome of an action this screen started
    ///
    /// On failure the optimistic change is reverted here and on every other
    /// screen, and the error is returned for the caller to surface. When a
    /// newer action on the same field is still in flight, the revert target
    /// passes to it instead; whichever of them fails last rolls back.
    pub fn settle(
        &mut self,
        action: &PendingAction,
        result: Result<(), ServiceError>,
    ) -> Result<(), SyncError> {
        let error = match result {
            Ok(()) => {
                self.ledger.confirm(&action.id);
                return Ok(());
            }
            Err(e) => e,
        };
        let failed = self
            .ledger
            .reject(&action.id)
            .unwrap_or_else(|| action.clone());

        match failed.compensation() {
            Some(_) if self.ledger.hand_over(&failed).is_some() => {
                tracing::debug!(
                    "[Screen] {} failed {:?} on {}, newer action now owns the revert",
                    self.name,
                    failed.intent,
                    failed.key
                );
            }
            Some(compensation) => {
                tracing::warn!(
                    "[Screen] {} reverting {:?} on {}: {}",
                    self.name,
                    failed.intent,
                    failed.key,
                    error
                );
                let feeds = reconcile(&mut self.store, &compensation)?;
                self.mark_dirty(feeds);
                self.broadcast(compensation, true);
            }
            None => {
                tracing::warn!(
                    "[Screen] {} could not delete {}: {}; refetch required",
                    self.name,
                    failed.key,
                    error
                );
            }
        }
        Err(SyncError::Service(error))
    }

    /// Apply every envelope waiting on the hub
    ///
    /// Returns how many of them changed this screen.
    pub fn pump(&mut self) -> usize {
        let skipped = self.subscription.skipped();
        let mut changed = 0;
        while let Some(envelope) = self.subscription.try_next() {
            if matches!(self.receive(envelope), Received::Applied(_)) {
                changed += 1;
            }
        }
        self.check_lag(skipped);
        changed
    }

    /// Wait for and process the next envelope
    ///
    /// Returns `None` once the hub is gone.
    pub async fn next_change(&mut self) -> Option<Received> {
        let skipped = self.subscription.skipped();
        let envelope = self.subscription.next().await;
        self.check_lag(skipped);
        Some(self.receive(envelope?))
    }

    /// Envelopes this screen lost to lag; its feeds may be stale
    pub fn skipped(&self) -> u64 {
        self.subscription.skipped()
    }

    fn check_lag(&mut self, before: u64) {
        let lost = self.subscription.skipped() - before;
        if lost == 0 {
            return;
        }
        tracing::warn!("[Screen] {} lost {} events, every feed needs a refetch", self.name, lost);
        let feeds: Vec<String> = self.store.feed_names().map(str::to_string).collect();
        self.mark_dirty(feeds);
    }

    fn receive(&mut self, envelope: Broadcast) -> Received {
        if self.suppressor.should_drop(&envelope) {
            tracing::trace!("[Screen] {} dropped echo #{}", self.name, envelope.sequence);
            return Received::Echo;
        }

        match reconcile(&mut self.store, &envelope.event) {
            Ok(feeds) if feeds.is_empty() => Received::Unchanged,
            Ok(feeds) => {
                tracing::debug!(
                    "[Screen] {} applied #{} {:?} from {}",
                    self.name,
                    envelope.sequence,
                    envelope.event.kind(),
                    envelope.origin
                );
                self.mark_dirty(feeds.iter().cloned());
                Received::Applied(feeds)
            }
            Err(e) => {
                tracing::warn!("[Screen] {} ignored #{}: {}", self.name, envelope.sequence, e);
                Received::Unchanged
            }
        }
    }

    fn mark_dirty(&mut self, feeds: impl IntoIterator<Item = String>) {
        self.dirty.extend(feeds);
    }

    /// Feeds whose view must be redrawn; clears the set
    pub fn take_dirty(&mut self) -> BTreeSet<String> {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self, feed: &str) -> bool {
        self.dirty.contains(feed)
    }

    pub fn pending(&self) -> &OptimisticLedger {
        &self.ledger
    }

    /// Forget actions older than the configured TTL
    pub fn expire_pending(&mut self) -> usize {
        self.ledger.expire_older_than(self.pending_ttl)
    }

    /// Serializable view of the screen for diagnostics
    pub fn snapshot(&self) -> ScreenSnapshot {
        let feeds = self
            .store
            .feed_names()
            .map(|feed| (feed.to_string(), self.store.feed(feed).cloned().collect::<Vec<_>>()))
            .collect();
        ScreenSnapshot {
            name: self.name.clone(),
            feeds,
            pending_actions: self.ledger.count_pending(),
        }
    }
}

/// Point-in-time copy of a screen's feeds
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ScreenSnapshot {
    pub name: String,
    pub feeds: BTreeMap<String, Vec<ContentItem>>,
    pub pending_actions: usize,
}
