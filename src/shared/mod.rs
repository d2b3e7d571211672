//! Shared Module
//!
//! Types used by every other module: the content model, change events,
//! errors and configuration. All of them are plain data and serializable.

/// Posts, cases and authors
pub mod content;

/// Change events and broadcast envelopes
pub mod event;

/// Shared error types
pub mod error;

/// Synchronization configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{ConfigError, EchoPolicy, RetryConfig, SyncConfig, SyncConfigBuilder};
pub use content::{Author, ContentItem, ContentKey, ContentKind, RevisionState, UserId};
pub use error::{ServiceError, SyncError};
pub use event::{Broadcast, ChangeEvent, CommentAction, EventKind, ScreenId};
