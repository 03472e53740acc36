//! Core downloader implementation split into focused submodules.
//!
//! The `AssetDownloader` struct and its methods are organized by stage:
//! - [`batching`] - The batch loop: markers, skip logic, bounded transfer batches
//! - [`post_process`] - Sequential decompression of `.lz4` outputs

mod batching;
mod post_process;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::config::Config;
use crate::error::Result;
use crate::index::IndexReader;
use crate::resolve::{PathResolver, UrlResolver};
use crate::transfer::{BlobFetcher, HttpFetcher, TransferExecutor};
use crate::types::{Event, PathStyle, RunSummary};
use std::sync::Arc;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main downloader instance (cloneable - all fields are Arc-wrapped or cheap)
#[derive(Clone)]
pub struct AssetDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Maps logical paths to destinations under the save root
    pub(crate) paths: PathResolver,
    /// Runs single transfers; shared by every transfer in a batch
    pub(crate) executor: Arc<TransferExecutor>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl AssetDownloader {
    /// Create a downloader that fetches over HTTP with the configured timeout
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.timeout())?);
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Create a downloader around any [`BlobFetcher`]
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn BlobFetcher>) -> Self {
        Self::with_fetcher_and_style(config, fetcher, PathStyle::host())
    }

    /// Create a downloader with an explicit host path style
    pub fn with_fetcher_and_style(
        config: Config,
        fetcher: Arc<dyn BlobFetcher>,
        style: PathStyle,
    ) -> Self {
        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let paths = PathResolver::new(config.save_root.clone(), style);
        let executor = Arc::new(TransferExecutor::new(
            UrlResolver::new(config.base_url.clone()),
            fetcher,
            config.timeout_minutes,
            config.debug,
            event_tx.clone(),
        ));

        Self {
            config: Arc::new(config),
            paths,
            executor,
            event_tx,
        }
    }

    /// Subscribe to run events
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// The configuration this downloader was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the index and download everything it lists.
    ///
    /// Fails only when the index cannot be read or the save root cannot be
    /// prepared; per-descriptor failures are counted in the summary.
    pub async fn run(&self) -> Result<RunSummary> {
        let index = IndexReader::open(&self.config.index_path).await?;
        let descriptors = index.list_all().await;
        index.close().await;

        self.run_descriptors(descriptors?).await
    }
}
