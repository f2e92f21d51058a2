//! Reconnect Policy
//!
//! Re-runs a whole store operation when SQLite or the pool reports a
//! transient failure. Fixed delay between attempts, bounded attempt count.

use crate::StorageError;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Default delay between attempts (seconds)
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 10;

/// SQLite primary result codes worth retrying: BUSY, LOCKED, CANTOPEN
const TRANSIENT_SQLITE_CODES: [i32; 3] = [5, 6, 14];

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before each retry
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Whether an sqlx error is worth another attempt
pub fn is_transient(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) => true,
        sqlx::Error::Tls(_) => true,
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(is_transient_sqlite_code)
            .unwrap_or(false),
        _ => false,
    }
}

/// Extended result codes carry the primary code in the low byte
fn is_transient_sqlite_code(code: i32) -> bool {
    TRANSIENT_SQLITE_CODES.contains(&(code & 0xff))
}

/// Run `operation` under `policy`.
///
/// Non-transient errors are returned immediately as [`StorageError::Database`].
/// A transient error on the last attempt becomes
/// [`StorageError::RetriesExhausted`].
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &'static str,
    mut operation: F,
) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;

        let error = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        operation = operation_name,
                        attempt, "Store operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        if !is_transient(&error) {
            return Err(StorageError::Database(error));
        }

        if attempt >= max_attempts {
            warn!(
                operation = operation_name,
                attempt,
                max_attempts,
                error = %error,
                "Store operation failed, no more retries"
            );
            return Err(StorageError::RetriesExhausted {
                operation: operation_name,
                attempts: attempt,
                source: error,
            });
        }

        warn!(
            operation = operation_name,
            attempt,
            max_attempts,
            error = %error,
            delay_ms = policy.delay.as_millis(),
            "Store operation failed, retrying"
        );
        tokio::time::sleep(policy.delay).await;
    }
}
