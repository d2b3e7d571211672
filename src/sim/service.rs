//! Scripted engagement backend for the simulation

use medfeed::offline::EngagementService;
use medfeed::shared::{ContentKey, ServiceError};
use std::collections::HashSet;
use std::time::Duration;

/// Accepts every call except those on keys it was told to reject
#[derive(Debug, Default)]
pub struct ScriptedService {
    rejected: HashSet<ContentKey>,
    latency: Duration,
}

impl ScriptedService {
    pub fn new(latency: Duration) -> Self {
        Self {
            rejected: HashSet::new(),
            latency,
        }
    }

    pub fn reject(mut self, key: ContentKey) -> Self {
        self.rejected.insert(key);
        self
    }

    async fn respond(&self, key: &ContentKey, call: &str) -> Result<(), ServiceError> {
        tokio::time::sleep(self.latency).await;
        if self.rejected.contains(key) {
            tracing::info!("[Backend] {} on {} rejected", call, key);
            return Err(ServiceError::rejected(format!("{} not permitted", call)));
        }
        tracing::info!("[Backend] {} on {} accepted", call, key);
        Ok(())
    }
}

impl EngagementService for ScriptedService {
    async fn set_liked(&self, key: &ContentKey, liked: bool) -> Result<(), ServiceError> {
        let call = if liked { "like" } else { "unlike" };
        self.respond(key, call).await
    }

    async fn set_bookmarked(&self, key: &ContentKey, bookmarked: bool) -> Result<(), ServiceError> {
        let call = if bookmarked { "bookmark" } else { "unbookmark" };
        self.respond(key, call).await
    }

    async fn delete(&self, key: &ContentKey) -> Result<(), ServiceError> {
        self.respond(key, "delete").await
    }
}
