//! Reconciliation
//!
//! Replays a [`ChangeEvent`] on a screen's store. The same function serves
//! the optimistic path (a screen applying its own change) and the listening
//! path (a screen catching up with someone else's).

use crate::screen::store::{Applied, FeedStore};
use crate::shared::content::{ContentItem, RevisionState};
use crate::shared::error::SyncError;
use crate::shared::event::{ChangeEvent, CommentAction};

/// Apply `event` to `store`, returning the feeds that need a refresh
///
/// Keys the store does not hold are skipped and yield an empty list.
pub fn reconcile(store: &mut FeedStore, event: &ChangeEvent) -> Result<Vec<String>, SyncError> {
    let applied = match event {
        ChangeEvent::VisibilityChanged { key } => {
            return Ok(store.remove(key));
        }
        ChangeEvent::LikeChanged { key, liked } => {
            store.apply(key, |item| Ok(item.set_liked(*liked)))?
        }
        ChangeEvent::BookmarkChanged { key, bookmarked } => {
            store.apply(key, |item| Ok(item.set_bookmarked(*bookmarked)))?
        }
        ChangeEvent::CommentCountChanged { key, path, action } => {
            // Replies do not change the count shown on the item.
            if !path.is_empty() {
                return Ok(Vec::new());
            }
            store.apply(key, |item| Ok(apply_comment(item, *action)))?
        }
        ChangeEvent::RevisionChanged { key } => store.apply(key, |item| {
            require_case(item)?;
            let changed = item.revision != RevisionState::Update;
            item.revision = RevisionState::Update;
            Ok(changed)
        })?,
        ChangeEvent::SolveChanged { key, diagnosis } => store.apply(key, |item| {
            require_case(item)?;
            let mut changed = !item.solved;
            item.solved = true;
            if diagnosis.is_some() && item.revision != RevisionState::Diagnosis {
                item.revision = RevisionState::Diagnosis;
                changed = true;
            }
            Ok(changed)
        })?,
        ChangeEvent::UserChanged { author } => {
            if store.replace_author(author.clone()) {
                return Ok(store.feeds_by_author(&author.id));
            }
            return Ok(Vec::new());
        }
    };

    match applied {
        Applied::Changed(feeds) => Ok(feeds),
        Applied::Unchanged => Ok(Vec::new()),
        Applied::Missing => {
            if let Some(key) = event.key() {
                tracing::trace!("[Screen] {} not held, skipping {:?}", key, event.kind());
            }
            Ok(Vec::new())
        }
    }
}

fn apply_comment(item: &mut ContentItem, action: CommentAction) -> bool {
    match action {
        CommentAction::Add => {
            item.comments = item.comments.saturating_add(1);
            true
        }
        CommentAction::Remove => {
            let before = item.comments;
            item.comments = item.comments.saturating_sub(1);
            before != item.comments
        }
        CommentAction::Edit => false,
    }
}

fn require_case(item: &ContentItem) -> Result<(), SyncError> {
    if item.is_case() {
        Ok(())
    } else {
        Err(SyncError::not_a_case(item.key.clone()))
    }
}
