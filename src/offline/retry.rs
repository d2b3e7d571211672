//! # Confirmation Retry
//!
//! Runs a pending action against the engagement service, retrying transient
//! failures with a fixed or exponential backoff.
//!
//! ## Features
//!
//! - **Exponential Backoff**: delay doubles per attempt, capped
//! - **Max Attempts**: the first call counts as attempt one
//! - **Fail Fast**: rejections are final and are not retried

use crate::offline::optimistic::PendingAction;
use crate::offline::service::{self, EngagementService};
use crate::shared::config::{BackoffKind, RetryConfig};
use crate::shared::error::ServiceError;
use std::time::Duration;

/// Backoff strategy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Same delay before every retry
    Fixed { interval: Duration },
    /// `base * 2^(attempt-1)`, capped at `max`
    Exponential { base: Duration, max: Duration },
}

/// Retry policy for backend confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub strategy: BackoffStrategy,
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Single attempt, no waiting
    pub fn none() -> Self {
        Self {
            strategy: BackoffStrategy::Fixed {
                interval: Duration::ZERO,
            },
            max_attempts: 1,
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match &self.strategy {
            BackoffStrategy::Fixed { interval } => *interval,
            BackoffStrategy::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                base.saturating_mul(factor).min(*max)
            }
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        let base = Duration::from_millis(config.base_delay_ms);
        let strategy = match config.strategy {
            BackoffKind::Fixed => BackoffStrategy::Fixed { interval: base },
            BackoffKind::Exponential => BackoffStrategy::Exponential {
                base,
                max: Duration::from_millis(config.max_delay_ms),
            },
        };
        Self {
            strategy,
            max_attempts: config.max_attempts.max(1),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// Confirm `action` with the backend
///
/// Returns the number of attempts used on success, or the last error.
pub async fn confirm<S>(
    service: &S,
    action: &PendingAction,
    policy: &RetryPolicy,
) -> Result<u32, ServiceError>
where
    S: EngagementService,
{
    let mut attempt = 1;
    loop {
        match service::execute(service, action).await {
            Ok(()) => {
                tracing::debug!(
                    "[Confirm] {:?} on {} confirmed after {} attempt(s)",
                    action.intent,
                    action.key,
                    attempt
                );
                return Ok(attempt);
            }
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::debug!(
                    "[Confirm] {:?} on {} failed ({}), retrying in {:?}",
                    action.intent,
                    action.key,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "[Confirm] {:?} on {} failed after {} attempt(s): {}",
                    action.intent,
                    action.key,
                    attempt,
                    e
                );
                return Err(e);
            }
        }
    }
}
