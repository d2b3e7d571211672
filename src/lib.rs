//! medfeed - Cross-Screen Content Consistency
//!
//! Client-side synchronization for a medical social-networking app. Several
//! screens (home feed, profile, search, bookmarks, ...) each cache their own
//! copies of posts and clinical cases; this crate keeps those copies
//! consistent when the viewer likes, bookmarks, comments on, revises, solves
//! or deletes content.
//!
//! # Module Structure
//!
//! - **`shared`** - content model, change events, errors, configuration
//! - **`realtime`** - the in-process content hub and its subscriptions
//! - **`screen`** - per-screen store, echo suppression, reconciliation
//! - **`offline`** - optimistic actions, backend confirmation, retries
//!
//! # Flow
//!
//! ```rust
//! use medfeed::realtime::ContentHub;
//! use medfeed::screen::Screen;
//! use medfeed::shared::{ContentItem, ContentKey, SyncConfig};
//!
//! let config = SyncConfig::default();
//! let hub = ContentHub::from_config(&config);
//! let mut home = Screen::new("home", &hub, &config);
//! let mut profile = Screen::new("profile", &hub, &config);
//!
//! let key = ContentKey::post("p1");
//! let post = ContentItem::new(key.clone(), "u1").with_likes(5, false);
//! home.load_feed("top", vec![post.clone()]);
//! home.load_feed("full", vec![post.clone()]);
//! profile.load_feed("posts", vec![post]);
//!
//! home.toggle_like(&key).unwrap();
//! home.pump();
//! profile.pump();
//!
//! assert_eq!(home.store().get(&key).unwrap().likes, 6);
//! assert_eq!(profile.store().get(&key).unwrap().likes, 6);
//! ```
//!
//! # Thread Safety
//!
//! - The hub is `Clone + Send + Sync` and can be shared freely
//! - A `Screen` is mutated through `&mut self` only; give each screen a
//!   single owner (the UI thread, or one task) and let the hub carry changes

/// Shared types and data structures
pub mod shared;

/// In-process content hub
pub mod realtime;

/// Screens and their local content
pub mod screen;

/// Optimistic engagement and backend confirmation
pub mod offline;
