// Element-state poller - fixed-interval sampling with a wall-clock deadline.
//
// Every auto-retrying wait in the suite (actionability checks, assertion
// retries, load-state sampling in the live backend) funnels through
// `wait_for_condition`.

use crate::error::Result;
use std::time::Duration;
use tokio::time::Instant;

/// Fixed interval between samples (100ms)
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Samples `condition` until it returns `Ok(true)` or `timeout` elapses.
///
/// The first sample is taken immediately. A sample that returns an error is
/// logged at debug level and counted as "not yet true" - the caller cannot
/// distinguish "stayed false" from "kept erroring" through the returned
/// boolean, only through the diagnostic log.
///
/// Never returns an error and never panics; `false` means the deadline
/// passed without a true sample.
pub async fn wait_for_condition<F>(mut condition: F, timeout: Duration) -> bool
where
    F: AsyncFnMut() -> Result<bool>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match condition().await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(error) => {
                // Swallowed: a failing sample must not abort the wait
                tracing::debug!(%error, "condition sample failed; treating as false");
            }
        }

        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
