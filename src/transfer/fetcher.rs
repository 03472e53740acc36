//! HTTP retrieval behind a trait so the executor can be tested without a network.

use crate::error::{Result, TransferError};
use std::time::Duration;

/// Abstraction over whole-body blob retrieval, enabling testability.
#[async_trait::async_trait]
pub trait BlobFetcher: Send + Sync {
    /// Fetch the full body at `url`, classifying any failure
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, TransferError>;
}

/// Production [`BlobFetcher`] sharing one `reqwest` client (and its connection
/// pool) across every concurrent transfer.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a client whose timeout bounds each request including its body
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("asset-dl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait::async_trait]
impl BlobFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, TransferError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransferError::from_reqwest(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                code: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransferError::from_reqwest(&e, self.timeout))?;
        Ok(body.to_vec())
    }
}
