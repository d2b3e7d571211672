//! # Optimistic Engagement
//!
//! Screens apply engagement gestures immediately and confirm them with the
//! backend afterwards. When confirmation fails for good, the initiating
//! screen broadcasts a compensating event so every other screen reverts too.
//!
//! ## Key Components
//!
//! - `optimistic.rs`: pending actions and the per-screen ledger
//! - `service.rs`: the engagement backend seam
//! - `retry.rs`: retry logic and backoff strategies
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn example<S: medfeed::offline::EngagementService>(
//! #     screen: &mut medfeed::screen::Screen,
//! #     service: &S,
//! # ) -> Result<(), medfeed::shared::SyncError> {
//! use medfeed::offline::{confirm, RetryPolicy};
//! use medfeed::shared::content::ContentKey;
//!
//! let action = screen.toggle_like(&ContentKey::post("p1"))?;
//! let result = confirm(service, &action, &RetryPolicy::default()).await;
//! screen.settle(&action, result.map(|_| ()))?;
//! # Ok(())
//! # }
//! ```

pub mod optimistic;
pub mod retry;
pub mod service;

pub use optimistic::{Intent, OptimisticLedger, PendingAction};
pub use retry::{confirm, BackoffStrategy, RetryPolicy};
pub use service::EngagementService;
