use std::fmt::Display;
use std::future::Future;
use tracing::{error, info, warn};

use crate::config::RetryPolicy;

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// Returns the last error once every attempt has failed.
pub async fn retry_with_policy<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation_name: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("Operation '{}' succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(e) if attempt < max_attempts => {
                warn!(
                    "Operation '{}' failed (attempt {}/{}), retrying in {}ms: {}",
                    operation_name,
                    attempt,
                    max_attempts,
                    policy.delay.as_millis(),
                    e
                );
                if !policy.delay.is_zero() {
                    tokio::time::sleep(policy.delay).await;
                }
                attempt += 1;
            }
            Err(e) => {
                error!(
                    "Operation '{}' failed after {} attempts: {}",
                    operation_name, max_attempts, e
                );
                return Err(e);
            }
        }
    }
}
