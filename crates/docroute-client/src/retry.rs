//! Retry with exponential backoff for collaborator calls.
//!
//! Only transport errors are retried. Status codes are the caller's to
//! inspect. Which transport errors count is the caller's [`RetryOn`] choice.

use std::time::Duration;

/// Retry attempts after the initial request.
const MAX_RETRIES: u32 = 3;

/// Base delay, doubled per attempt: 200ms, 400ms, 800ms.
const BASE_DELAY_MS: u64 = 200;

/// Transport failures worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryOn {
    /// Any transport error, timeouts included. For reads.
    AnyTransport,
    /// Only failures to connect. Nothing reached the service, so the
    /// request body is never delivered twice.
    ConnectOnly,
}

impl RetryOn {
    fn allows(self, err: &reqwest::Error) -> bool {
        match self {
            RetryOn::AnyTransport => true,
            RetryOn::ConnectOnly => err.is_connect(),
        }
    }
}

/// Delay before retry number `attempt + 1`.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS << attempt.min(16))
}

/// Call `f` up to `MAX_RETRIES + 1` times until it yields a response or
/// fails in a way `policy` does not retry.
pub(crate) async fn retry_send<F, Fut>(
    service: &'static str,
    policy: RetryOn,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if !policy.allows(&e) => {
                tracing::warn!(
                    service,
                    attempt = attempt + 1,
                    ?policy,
                    "request failed, not retried: {e}"
                );
                return Err(e);
            }
            Err(e) => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    service,
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn count_calls(policy: RetryOn) -> (Result<reqwest::Response, reqwest::Error>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        let result = retry_send("directory", policy, || {
            let counter = counter.clone();
            let http = http.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                http.get("http://127.0.0.1:1/").send().await
            }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[test]
    fn backoff_doubles_from_base() {
        let delays: Vec<u64> = (0..MAX_RETRIES)
            .map(|a| backoff_delay(a).as_millis() as u64)
            .collect();
        assert_eq!(delays, vec![200, 400, 800]);
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        assert_eq!(backoff_delay(40), backoff_delay(16));
    }

    #[tokio::test]
    async fn exhausts_all_attempts_on_transport_failure() {
        let started = std::time::Instant::now();
        let (result, calls) = count_calls(RetryOn::AnyTransport).await;
        assert!(result.is_err());
        assert_eq!(calls, MAX_RETRIES + 1);
        assert!(started.elapsed() >= Duration::from_millis(200 + 400 + 800));
    }

    #[tokio::test]
    async fn connect_only_still_retries_refused_connections() {
        let (result, calls) = count_calls(RetryOn::ConnectOnly).await;
        assert!(result.unwrap_err().is_connect());
        assert_eq!(calls, MAX_RETRIES + 1);
    }
}
