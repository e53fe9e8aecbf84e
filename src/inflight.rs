//! Latest-request-wins coordination for search endpoints.
//!
//! Each key (browser session + endpoint) has at most one backend request in
//! flight. Starting a new one aborts the task of the previous one, whose
//! caller then receives [`InflightError::Superseded`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::task::AbortHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InflightError {
    #[error("request superseded by a newer one")]
    Superseded,

    #[error("request task failed: {0}")]
    Failed(String),
}

type Entries = HashMap<String, (u64, AbortHandle)>;

#[derive(Clone, Debug, Default)]
pub struct LatestOnly {
    entries: Arc<Mutex<Entries>>,
    counter: Arc<AtomicU64>,
}

impl LatestOnly {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `fut` as the current request for `key`, aborting the previous one.
    pub async fn run<F, T>(&self, key: &str, fut: F) -> Result<T, InflightError>
    where
        F: Future<Output = T> + 'static,
        T: 'static,
    {
        let ticket = self.counter.fetch_add(1, Ordering::Relaxed);
        let handle = actix_web::rt::spawn(fut);

        if let Some((_, previous)) = self
            .entries()
            .insert(key.to_string(), (ticket, handle.abort_handle()))
        {
            previous.abort();
        }

        let result = handle.await;

        {
            let mut entries = self.entries();
            if entries.get(key).is_some_and(|(current, _)| *current == ticket) {
                entries.remove(key);
            }
        }

        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_cancelled() => {
                log::debug!("Request `{key}` superseded");
                Err(InflightError::Superseded)
            }
            Err(err) => Err(InflightError::Failed(err.to_string())),
        }
    }

    /// Number of keys with a request in flight.
    #[cfg(test)]
    fn pending(&self) -> usize {
        self.entries().len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[actix_web::test]
    async fn completes_when_alone() {
        let latest = LatestOnly::new();
        let value = latest.run("s1:search", async { 7 }).await;
        assert_eq!(value, Ok(7));
        assert_eq!(latest.pending(), 0);
    }

    #[actix_web::test]
    async fn newer_request_supersedes_older_one() {
        let latest = LatestOnly::new();

        let slow = {
            let latest = latest.clone();
            actix_web::rt::spawn(async move {
                latest
                    .run("s1:search", async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        "old"
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fresh = latest.run("s1:search", async { "new" }).await;
        assert_eq!(fresh, Ok("new"));
        assert_eq!(slow.await.unwrap(), Err(InflightError::Superseded));
        assert_eq!(latest.pending(), 0);
    }

    #[actix_web::test]
    async fn distinct_keys_do_not_interfere() {
        let latest = LatestOnly::new();

        let other = {
            let latest = latest.clone();
            actix_web::rt::spawn(async move {
                latest
                    .run("s2:search", async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        2
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(latest.run("s1:search", async { 1 }).await, Ok(1));
        assert_eq!(other.await.unwrap(), Ok(2));
    }
}
