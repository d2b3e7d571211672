//! # Optimistic Actions
//!
//! Every engagement gesture is applied to the screen immediately and
//! recorded here as a [`PendingAction`] until the backend confirms or
//! rejects it.
//!
//! ## Usage
//!
//! ```rust
//! use medfeed::offline::{Intent, OptimisticLedger, PendingAction};
//! use medfeed::shared::content::ContentKey;
//!
//! let mut ledger = OptimisticLedger::new();
//! let action = ledger.record(PendingAction::new(ContentKey::post("p1"), Intent::Like(true)));
//!
//! // Backend confirmed
//! assert!(ledger.confirm(&action.id).is_some());
//! assert_eq!(ledger.count_pending(), 0);
//! ```

use crate::shared::content::ContentKey;
use crate::shared::event::ChangeEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// The state the viewer asked the backend to reach
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// New desired like state
    Like(bool),
    /// New desired bookmark state
    Bookmark(bool),
    /// Owner deleted the item
    Delete,
}

impl Intent {
    /// Whether both intents drive the same field
    pub fn same_field(&self, other: &Intent) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// An optimistic change awaiting backend confirmation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAction {
    pub id: Uuid,
    /// Per-ledger order, assigned by [`OptimisticLedger::record`]
    pub seq: u64,
    pub key: ContentKey,
    pub intent: Intent,
    /// State to restore if the backend refuses; `None` for deletes
    pub revert_to: Option<Intent>,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    /// Action whose revert target is the opposite of `intent`
    pub fn new(key: ContentKey, intent: Intent) -> Self {
        let revert_to = match intent {
            Intent::Like(liked) => Some(Intent::Like(!liked)),
            Intent::Bookmark(bookmarked) => Some(Intent::Bookmark(!bookmarked)),
            Intent::Delete => None,
        };
        Self {
            id: Uuid::new_v4(),
            seq: 0,
            key,
            intent,
            revert_to,
            created_at: Utc::now(),
        }
    }

    /// Event announcing the optimistic change
    pub fn event(&self) -> ChangeEvent {
        let key = self.key.clone();
        match self.intent {
            Intent::Like(liked) => ChangeEvent::LikeChanged { key, liked },
            Intent::Bookmark(bookmarked) => ChangeEvent::BookmarkChanged { key, bookmarked },
            Intent::Delete => ChangeEvent::VisibilityChanged { key },
        }
    }

    /// Event that restores `revert_to`
    ///
    /// Deletion has none: other screens already dropped their copies and
    /// only a refetch can bring the item back.
    pub fn compensation(&self) -> Option<ChangeEvent> {
        let key = self.key.clone();
        match self.revert_to? {
            Intent::Like(liked) => Some(ChangeEvent::LikeChanged { key, liked }),
            Intent::Bookmark(bookmarked) => Some(ChangeEvent::BookmarkChanged { key, bookmarked }),
            Intent::Delete => None,
        }
    }

    fn supersedes(&self, older: &PendingAction) -> bool {
        self.key == older.key && self.intent.same_field(&older.intent) && self.seq > older.seq
    }
}

/// Pending optimistic actions of one screen
#[derive(Debug, Default)]
pub struct OptimisticLedger {
    pending: HashMap<Uuid, PendingAction>,
    next_seq: u64,
}

impl OptimisticLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an action, stamping its order; returns the stamped copy
    pub fn record(&mut self, mut action: PendingAction) -> PendingAction {
        self.next_seq += 1;
        action.seq = self.next_seq;
        self.pending.insert(action.id, action.clone());
        action
    }

    /// Forget a confirmed action
    pub fn confirm(&mut self, id: &Uuid) -> Option<PendingAction> {
        self.pending.remove(id)
    }

    /// Forget a rejected action. Returns the tracked copy, whose revert
    /// target may have been handed over from an older failure
    pub fn reject(&mut self, id: &Uuid) -> Option<PendingAction> {
        self.pending.remove(id)
    }

    /// Pass the revert target of a failed action to the next newer pending
    /// action on the same field, which now owns the rollback
    ///
    /// Returns the id of that action, or `None` when nothing newer is pending.
    pub fn hand_over(&mut self, failed: &PendingAction) -> Option<Uuid> {
        let successor = self
            .pending
            .values_mut()
            .filter(|action| action.supersedes(failed))
            .min_by_key(|action| action.seq)?;
        successor.revert_to = failed.revert_to;
        Some(successor.id)
    }

    pub fn is_pending(&self, id: &Uuid) -> bool {
        self.pending.contains_key(id)
    }

    /// Pending actions, oldest first
    pub fn pending(&self) -> Vec<&PendingAction> {
        let mut actions: Vec<_> = self.pending.values().collect();
        actions.sort_by_key(|action| action.seq);
        actions
    }

    /// Pending actions for one item
    pub fn pending_for(&self, key: &ContentKey) -> Vec<&PendingAction> {
        self.pending()
            .into_iter()
            .filter(|action| &action.key == key)
            .collect()
    }

    pub fn count_pending(&self) -> usize {
        self.pending.len()
    }

    /// Drop actions whose confirmation never arrived
    ///
    /// Returns how many were dropped.
    pub fn expire_older_than(&mut self, max_age: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return 0;
        };
        let before = self.pending.len();
        self.pending.retain(|_, action| action.created_at > cutoff);
        before - self.pending.len()
    }
}
