//! Bounded polling waits.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Error, Result};

/// Interval between checks of page state.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Default bound for element waits.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Polls `check` until it yields `Some`, an error, or `timeout` elapses.
///
/// The check always runs at least once, so a zero timeout degenerates to a
/// single check. Errors from the check end the wait immediately.
pub async fn poll_until<T, F, Fut>(timeout: Duration, interval: Duration, condition: &str, mut check: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<T>>>,
{
	let deadline = Instant::now() + timeout;

	loop {
		if let Some(value) = check().await? {
			return Ok(value);
		}

		let now = Instant::now();
		if now >= deadline {
			return Err(Error::Timeout {
				ms: timeout.as_millis() as u64,
				condition: condition.to_string(),
			});
		}
		tokio::time::sleep(interval.min(deadline - now)).await;
	}
}
