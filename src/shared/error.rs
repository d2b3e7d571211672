//! Shared Error Types
//!
//! Error types for the content synchronization layer.
//!
//! # Error Categories
//!
//! - `NotFound` - an action targeted an item the screen does not hold
//! - `NotACase` - a case-only change was applied to a post
//! - `Service` - the engagement backend rejected or could not process a call
//! - `Config` - configuration could not be loaded or failed validation
//!
//! An id that is absent from a *listening* screen is not an error; the
//! reconciler skips it silently.
//!
//! # Usage
//!
//! ```rust
//! use medfeed::shared::content::ContentKey;
//! use medfeed::shared::error::SyncError;
//!
//! let error = SyncError::not_found(ContentKey::post("p1"));
//! assert!(error.to_string().contains("post/p1"));
//! ```
use crate::shared::config::ConfigError;
use crate::shared::content::ContentKey;
use thiserror::Error;

/// Errors raised by the synchronization layer
#[derive(Debug, Error, Clone)]
pub enum SyncError {
    /// The screen holds no copy of the item
    #[error("content not found: {key}")]
    NotFound {
        /// Missing item
        key: ContentKey,
    },

    /// A case-only field was targeted on a post
    #[error("{key} is not a case")]
    NotACase {
        /// Offending item
        key: ContentKey,
    },

    /// The engagement backend failed
    #[error("engagement service error: {0}")]
    Service(#[from] ServiceError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SyncError {
    /// Create a not-found error
    pub fn not_found(key: ContentKey) -> Self {
        Self::NotFound { key }
    }

    /// Create a not-a-case error
    pub fn not_a_case(key: ContentKey) -> Self {
        Self::NotACase { key }
    }
}

/// Failure reported by the engagement backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Backend refused the change; retrying will not help
    #[error("rejected: {reason}")]
    Rejected {
        /// Human-readable reason
        reason: String,
    },

    /// Backend could not be reached or timed out
    #[error("unavailable: {reason}")]
    Unavailable {
        /// Human-readable reason
        reason: String,
    },
}

impl ServiceError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
