//! Content Change Events
//!
//! This module defines the events screens exchange through the content hub.
//! Each event carries enough information to replay the mutation on any
//! independent copy of the referenced item.

use crate::shared::content::{Author, ContentKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// What happened to a comment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CommentAction {
    Add,
    Remove,
    Edit,
}

/// Change to a piece of content or a user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// Item was deleted or hidden from the viewer
    VisibilityChanged { key: ContentKey },
    /// Viewer liked or unliked the item
    LikeChanged { key: ContentKey, liked: bool },
    /// Viewer bookmarked or removed the bookmark
    BookmarkChanged { key: ContentKey, bookmarked: bool },
    /// A comment was added, removed or edited.
    ///
    /// `path` is the chain of parent comment ids; empty means top-level.
    CommentCountChanged {
        key: ContentKey,
        path: Vec<String>,
        action: CommentAction,
    },
    /// Case author posted a revision
    RevisionChanged { key: ContentKey },
    /// Case was marked solved, optionally with a diagnosis
    SolveChanged {
        key: ContentKey,
        diagnosis: Option<String>,
    },
    /// A user record changed and carries the full new record
    UserChanged { author: Author },
}

/// Channel an event travels on; subscriptions filter by it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Visibility,
    Like,
    Bookmark,
    Comment,
    Revision,
    Solve,
    User,
}

impl EventKind {
    /// Every kind, in declaration order
    pub const ALL: [EventKind; 7] = [
        EventKind::Visibility,
        EventKind::Like,
        EventKind::Bookmark,
        EventKind::Comment,
        EventKind::Revision,
        EventKind::Solve,
        EventKind::User,
    ];
}

impl ChangeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ChangeEvent::VisibilityChanged { .. } => EventKind::Visibility,
            ChangeEvent::LikeChanged { .. } => EventKind::Like,
            ChangeEvent::BookmarkChanged { .. } => EventKind::Bookmark,
            ChangeEvent::CommentCountChanged { .. } => EventKind::Comment,
            ChangeEvent::RevisionChanged { .. } => EventKind::Revision,
            ChangeEvent::SolveChanged { .. } => EventKind::Solve,
            ChangeEvent::UserChanged { .. } => EventKind::User,
        }
    }

    /// Content the event refers to, if any
    pub fn key(&self) -> Option<&ContentKey> {
        match self {
            ChangeEvent::VisibilityChanged { key }
            | ChangeEvent::LikeChanged { key, .. }
            | ChangeEvent::BookmarkChanged { key, .. }
            | ChangeEvent::CommentCountChanged { key, .. }
            | ChangeEvent::RevisionChanged { key }
            | ChangeEvent::SolveChanged { key, .. } => Some(key),
            ChangeEvent::UserChanged { .. } => None,
        }
    }

    /// Create a top-level comment event
    pub fn comment(key: ContentKey, action: CommentAction) -> Self {
        ChangeEvent::CommentCountChanged {
            key,
            path: Vec::new(),
            action,
        }
    }
}

/// Identity of a live screen
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ScreenId(Uuid);

impl ScreenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to tell screens apart in logs.
        let full = self.0.simple().to_string();
        f.write_str(&full[..8])
    }
}

/// Envelope the hub delivers to every subscriber
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Broadcast {
    /// Screen that produced the event
    pub origin: ScreenId,
    /// Hub-assigned, strictly increasing per process
    pub sequence: u64,
    pub sent_at: DateTime<Utc>,
    /// True when the event reverts an optimistic change the backend rejected
    pub compensating: bool,
    pub event: ChangeEvent,
}
