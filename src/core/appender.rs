//! Durable row append: a plain retry loop driven by an explicit policy.

use crate::domain::model::{AppendOutcome, OutputRow};
use crate::domain::ports::SheetStore;
use crate::utils::error::Result;
use std::time::Duration;

/// Exponential backoff schedule for remote appends: `base_delay` doubled
/// per attempt, capped at `max_delay` per attempt, at most `max_attempts`
/// tries in total.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(10),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following failure number `failures` (1-based):
    /// base, base*2, base*4, ... capped at `max_delay`.
    pub fn delay_after(&self, failures: u32) -> Duration {
        let doublings = failures.saturating_sub(1).min(30);
        let delay = self
            .base_delay
            .checked_mul(1u32 << doublings)
            .unwrap_or(self.max_delay);
        delay.min(self.max_delay)
    }
}

/// Appends rows to the sheet, absorbing transient remote failures. The
/// append itself is not idempotent, so callers invoke this at most once
/// per validated submission.
pub struct RowAppender {
    policy: RetryPolicy,
}

impl RowAppender {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Retries until the remote accepts the rows or the policy's attempt
    /// budget runs out, in which case the final remote error is surfaced
    /// to the caller unchanged.
    pub async fn append<S: SheetStore>(
        &self,
        store: &S,
        rows: &[OutputRow],
    ) -> Result<AppendOutcome> {
        let mut failures = 0u32;
        loop {
            match store.append_rows(rows).await {
                Ok(outcome) => {
                    if failures > 0 {
                        tracing::info!("Append succeeded after {} failed attempts", failures);
                    }
                    return Ok(outcome);
                }
                Err(err) => {
                    failures += 1;
                    if failures >= self.policy.max_attempts {
                        tracing::error!(
                            "Append failed after {} attempts, giving up: {}",
                            failures,
                            err
                        );
                        return Err(err);
                    }
                    let delay = self.policy.delay_after(failures);
                    tracing::warn!(
                        "Append attempt {} failed: {}; retrying in {:?}",
                        failures,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
