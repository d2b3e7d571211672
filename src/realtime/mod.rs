//! Content Hub Module
//!
//! In-process publish/subscribe for content change events.
//!
//! # Architecture
//!
//! - **`broadcast`** - the hub itself and envelope sequencing
//! - **`subscription`** - filtered receivers, sync and async
//!
//! # Event Filtering
//!
//! Subscribers pass the event kinds they care about:
//! - `&[EventKind::Like, EventKind::Bookmark]` - engagement only
//! - `&[]` - every kind
//!
//! # Example
//!
//! ```rust
//! use medfeed::realtime::ContentHub;
//! use medfeed::shared::content::ContentKey;
//! use medfeed::shared::event::{ChangeEvent, EventKind, ScreenId};
//!
//! let hub = ContentHub::new(64);
//! let mut likes = hub.subscribe(&[EventKind::Like]);
//!
//! hub.publish(
//!     ScreenId::new(),
//!     ChangeEvent::LikeChanged { key: ContentKey::post("p1"), liked: true },
//! );
//! assert!(likes.try_next().is_some());
//! ```

/// Event broadcasting
pub mod broadcast;

/// Filtered subscriptions
pub mod subscription;

pub use broadcast::ContentHub;
pub use subscription::Subscription;
