//! Shared test helpers for creating AssetDownloader instances in tests.

use crate::config::Config;
use crate::downloader::AssetDownloader;
use crate::error::TransferError;
use crate::transfer::BlobFetcher;
use crate::types::PathStyle;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

/// Base URL used by every test downloader.
pub(crate) const TEST_BASE_URL: &str = "https://cdn.example.com/";

/// In-memory CDN that records traffic and tracks how many fetches overlap.
#[derive(Default)]
pub(crate) struct MockCdn {
    /// Bodies served per URL; unknown URLs echo the URL back as the body
    bodies: HashMap<String, Vec<u8>>,
    /// URLs that answer 403
    forbidden: HashSet<String>,
    /// How long each fetch stays in flight
    latency: Duration,
    /// Fetches currently in flight
    in_flight: AtomicUsize,
    /// Highest number of fetches seen in flight at once
    pub(crate) max_in_flight: AtomicUsize,
    /// Fetches that have finished
    pub(crate) finished: AtomicUsize,
    /// `(url, fetches finished when this one started)` in start order
    pub(crate) started: Mutex<Vec<(String, usize)>>,
}

impl MockCdn {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub(crate) fn forbid(mut self, url: &str) -> Self {
        self.forbidden.insert(url.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    pub(crate) fn requested(&self) -> Vec<String> {
        self.started
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl BlobFetcher for MockCdn {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TransferError> {
        let finished_before = self.finished.load(Ordering::SeqCst);
        self.started
            .lock()
            .unwrap()
            .push((url.to_string(), finished_before));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);

        if self.forbidden.contains(url) {
            return Err(TransferError::Status { code: 403 });
        }
        Ok(self
            .bodies
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.as_bytes().to_vec()))
    }
}

/// Config rooted in a fresh temp dir (which must be kept alive).
pub(crate) fn test_config() -> (Config, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = Config {
        save_root: temp_dir.path().join("dat"),
        index_path: temp_dir.path().join("meta"),
        base_url: TEST_BASE_URL.to_string(),
        ..Config::default()
    };
    (config, temp_dir)
}

/// Downloader over `cdn` with a `/`-separated path style.
pub(crate) fn create_test_downloader(config: Config, cdn: Arc<MockCdn>) -> AssetDownloader {
    AssetDownloader::with_fetcher_and_style(config, cdn, PathStyle { separator: '/' })
}
