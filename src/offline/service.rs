//! Engagement backend seam
//!
//! The crate never talks to the network itself. Applications implement
//! [`EngagementService`] over their backend client; tests use scripted fakes.

use crate::offline::optimistic::{Intent, PendingAction};
use crate::shared::content::ContentKey;
use crate::shared::error::ServiceError;
use std::future::Future;

/// Backend calls that confirm optimistic engagement changes
///
/// Every call receives the *new* desired state.
pub trait EngagementService: Send + Sync {
    fn set_liked(
        &self,
        key: &ContentKey,
        liked: bool,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn set_bookmarked(
        &self,
        key: &ContentKey,
        bookmarked: bool,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;

    fn delete(&self, key: &ContentKey) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Dispatch a pending action to the matching service call
pub async fn execute<S>(service: &S, action: &PendingAction) -> Result<(), ServiceError>
where
    S: EngagementService,
{
    match action.intent {
        Intent::Like(liked) => service.set_liked(&action.key, liked).await,
        Intent::Bookmark(bookmarked) => service.set_bookmarked(&action.key, bookmarked).await,
        Intent::Delete => service.delete(&action.key).await,
    }
}
