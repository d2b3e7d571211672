//! Echo suppression
//!
//! A screen applies its own changes optimistically before broadcasting them,
//! so the copy the hub hands back must not be applied a second time.

use crate::shared::config::EchoPolicy;
use crate::shared::event::{Broadcast, ScreenId};

/// Decides whether a received envelope is this screen's own echo
#[derive(Debug, Clone)]
pub struct EchoSuppressor {
    owner: ScreenId,
    policy: EchoPolicy,
    /// Only used by [`EchoPolicy::LegacyFlag`]
    originated_locally: bool,
}

impl EchoSuppressor {
    pub fn new(owner: ScreenId, policy: EchoPolicy) -> Self {
        Self {
            owner,
            policy,
            originated_locally: false,
        }
    }

    pub fn policy(&self) -> EchoPolicy {
        self.policy
    }

    /// Call immediately before broadcasting.
    ///
    /// Under the legacy policy this sets the one-shot flag; setting it twice
    /// is still a single pending suppression.
    pub fn mark_outgoing(&mut self) {
        if self.policy == EchoPolicy::LegacyFlag {
            self.originated_locally = true;
        }
    }

    /// Returns true when the envelope must be dropped
    pub fn should_drop(&mut self, envelope: &Broadcast) -> bool {
        match self.policy {
            EchoPolicy::Origin => envelope.origin == self.owner,
            EchoPolicy::LegacyFlag => std::mem::take(&mut self.originated_locally),
        }
    }

    /// Whether a legacy suppression is pending
    pub fn is_armed(&self) -> bool {
        self.originated_locally
    }
}
