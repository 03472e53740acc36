//! Transfer executor: one HTTP retrieval plus write-to-disk per call.
//!
//! [`TransferExecutor::download`] is total: every failure is classified,
//! reported and turned into `false`, so a batch never sees a fault.

mod fetcher;


pub use fetcher::{BlobFetcher, HttpFetcher};

use crate::error::TransferError;
use crate::resolve::{UrlResolver, collision_safe_target};
use crate::types::{Event, Resolution};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Failure code used in events when no URL could be built
const UNRESOLVED_URL: &str = "unresolved_url";

/// Executes single transfers; cheap to share behind an `Arc` across a batch
pub struct TransferExecutor {
    urls: UrlResolver,
    fetcher: Arc<dyn BlobFetcher>,
    timeout_minutes: u64,
    debug: bool,
    event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl TransferExecutor {
    /// Create an executor around a shared fetcher
    pub fn new(
        urls: UrlResolver,
        fetcher: Arc<dyn BlobFetcher>,
        timeout_minutes: u64,
        debug: bool,
        event_tx: tokio::sync::broadcast::Sender<Event>,
    ) -> Self {
        Self {
            urls,
            fetcher,
            timeout_minutes,
            debug,
            event_tx,
        }
    }

    /// Download the blob `hash` of `category` into `destination`.
    ///
    /// Returns `true` once every byte is on disk. Exactly one attempt is made.
    pub async fn download(&self, hash: &str, category: &str, destination: &Path) -> bool {
        let url = match self.urls.resolve(hash, category) {
            Resolution::Ready(url) => url,
            Resolution::Skip(reason) => {
                tracing::error!(
                    destination = ?destination,
                    category = %category,
                    reason = %reason,
                    "Download URL is empty, skipping"
                );
                self.event_tx
                    .send(Event::TransferFailed {
                        url: String::new(),
                        destination: destination.to_path_buf(),
                        reason: UNRESOLVED_URL.to_string(),
                    })
                    .ok();
                return false;
            }
        };

        if self.debug {
            tracing::info!(destination = ?destination, "Started downloading");
        }

        match self.transfer(&url, destination).await {
            Ok(written) => {
                if self.debug {
                    tracing::info!(destination = ?written, "Downloaded");
                }
                true
            }
            Err(e) => {
                self.report_failure(&url, destination, &e);
                false
            }
        }
    }

    /// GET the body, then write it to the collision-safe target.
    async fn transfer(&self, url: &str, destination: &Path) -> Result<PathBuf, TransferError> {
        let bytes = self.fetcher.fetch(url).await?;

        let target = collision_safe_target(destination);
        if target != destination {
            tracing::debug!(
                destination = ?destination,
                target = ?target,
                "Destination is a directory, nesting file inside it"
            );
        }

        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|source| TransferError::Write {
                path: target.clone(),
                source,
            })?;
        Ok(target)
    }

    fn report_failure(&self, url: &str, destination: &Path, error: &TransferError) {
        tracing::error!(
            url = %url,
            missing_file = ?destination,
            reason = error.code(),
            error = %error,
            "Failed to download"
        );
        if let Some(hint) = remediation_hint(error, self.timeout_minutes) {
            tracing::warn!(url = %url, "Possible workaround: {}", hint);
        }

        self.event_tx
            .send(Event::TransferFailed {
                url: url.to_string(),
                destination: destination.to_path_buf(),
                reason: error.code().to_string(),
            })
            .ok();
    }
}

/// Remediation advice for failures the user can act on.
pub fn remediation_hint(error: &TransferError, timeout_minutes: u64) -> Option<String> {
    match error {
        TransferError::Timeout { .. } => Some(format!(
            "the download exceeded the {timeout_minutes} minute timeout; \
             restart the program or increase timeout_minutes"
        )),
        e if e.is_blocked() => Some(
            "this is often a 403 (forbidden) response ending the download early; \
             when the run finishes, re-run with skip_existing = true to fetch only the \
             missing files, or open the URL above in a browser to download it manually"
                .to_string(),
        ),
        _ => None,
    }
}
