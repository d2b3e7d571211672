//! Content Data Structures
//!
//! Posts and clinical cases as the client holds them in memory. Only the
//! fields that engagement actions touch live here; rendering data stays with
//! the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a user record.
pub type UserId = String;

/// Which backend collection an item belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Regular feed post
    Post,
    /// Clinical case
    Case,
}

/// Identity of a logical content item.
///
/// A post and a case may share the same id string, so the kind is part of
/// the key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentKey {
    /// Collection the item lives in
    pub kind: ContentKind,
    /// Backend document id
    pub id: String,
}

impl ContentKey {
    /// Key of a post
    pub fn post(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Post,
            id: id.into(),
        }
    }

    /// Key of a clinical case
    pub fn case(id: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::Case,
            id: id.into(),
        }
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ContentKind::Post => write!(f, "post/{}", self.id),
            ContentKind::Case => write!(f, "case/{}", self.id),
        }
    }
}

/// Revision marker shown on a clinical case.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RevisionState {
    /// Never revised
    #[default]
    None,
    /// Author posted an update
    Update,
    /// Author posted the diagnosis
    Diagnosis,
}

/// A post or case as cached by a screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    pub key: ContentKey,
    pub author_id: UserId,
    pub likes: u32,
    pub liked: bool,
    pub bookmarked: bool,
    pub comments: u32,
    pub visible: bool,
    /// Case only
    pub revision: RevisionState,
    /// Case only
    pub solved: bool,
}

impl ContentItem {
    /// Create a fresh item with no engagement
    pub fn new(key: ContentKey, author_id: impl Into<UserId>) -> Self {
        Self {
            key,
            author_id: author_id.into(),
            likes: 0,
            liked: false,
            bookmarked: false,
            comments: 0,
            visible: true,
            revision: RevisionState::None,
            solved: false,
        }
    }

    /// Set the like counter and viewer flag
    pub fn with_likes(mut self, likes: u32, liked: bool) -> Self {
        self.likes = likes;
        self.liked = liked;
        self
    }

    /// Set the comment counter
    pub fn with_comments(mut self, comments: u32) -> Self {
        self.comments = comments;
        self
    }

    /// Set the bookmark flag
    pub fn with_bookmark(mut self, bookmarked: bool) -> Self {
        self.bookmarked = bookmarked;
        self
    }

    pub fn is_case(&self) -> bool {
        self.key.kind == ContentKind::Case
    }

    /// Set the viewer's like flag, adjusting the counter only on a transition.
    ///
    /// Returns whether anything changed.
    pub fn set_liked(&mut self, liked: bool) -> bool {
        if self.liked == liked {
            return false;
        }
        self.liked = liked;
        self.likes = if liked {
            self.likes.saturating_add(1)
        } else {
            self.likes.saturating_sub(1)
        };
        true
    }

    /// Set the viewer's bookmark flag. Returns whether anything changed.
    pub fn set_bookmarked(&mut self, bookmarked: bool) -> bool {
        let changed = self.bookmarked != bookmarked;
        self.bookmarked = bookmarked;
        changed
    }
}

/// A user record, cached for display only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub profession: Option<String>,
    pub avatar_url: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profession: None,
            avatar_url: None,
        }
    }
}
