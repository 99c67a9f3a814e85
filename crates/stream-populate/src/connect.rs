//! Startup connectivity check with a bounded retry budget.

use crate::error::PopulateError;
use std::time::Duration;
use stream_store::Store;

/// Wait until `store` answers a ping.
///
/// Retries up to `max_retries` times, `retry_delay` apart, to ride out a
/// store that is still starting. Exhausting the budget is fatal for the
/// caller.
pub async fn wait_for_store(
    store: &dyn Store,
    max_retries: u32,
    retry_delay: Duration,
) -> Result<(), PopulateError> {
    let max_retries = max_retries.max(1);
    let mut last_error = None;

    for attempt in 1..=max_retries {
        match store.ping().await {
            Ok(()) => {
                if attempt > 1 {
                    tracing::info!("Connected to {} after {} attempts", store.name(), attempt);
                } else {
                    tracing::info!("Connected to {}", store.name());
                }
                return Ok(());
            }
            Err(e) => {
                if attempt < max_retries {
                    tracing::warn!(
                        "{} not ready yet (attempt {}/{}): {}. Retrying in {:?}...",
                        store.name(),
                        attempt,
                        max_retries,
                        e,
                        retry_delay
                    );
                    tokio::time::sleep(retry_delay).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(PopulateError::Connection(format!(
        "failed to connect to {} after {} attempts. Last error: {}",
        store.name(),
        max_retries,
        last_error.map_or_else(|| "none".to_string(), |e| e.to_string())
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream_store::MemoryStore;

    #[tokio::test]
    async fn test_reachable_store() {
        let store = MemoryStore::new();
        wait_for_store(&store, 3, Duration::from_millis(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_store_exhausts_budget() {
        let store = MemoryStore::new();
        store.set_fail_queries(true);

        let err = wait_for_store(&store, 3, Duration::from_millis(1))
            .await
            .unwrap_err();

        assert!(matches!(err, PopulateError::Connection(_)));
        assert!(err.to_string().contains("after 3 attempts"));
    }
}
