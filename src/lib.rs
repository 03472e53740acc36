//! # asset-dl
//!
//! Bulk, batched, concurrent retrieval of game asset blobs from a
//! content-addressed CDN into a local directory tree.
//!
//! ## How a run works
//!
//! 1. The SQLite index (table `a`, columns `n`, `h`, `m`) is read in full
//! 2. Directory markers (`//name/`) become folders under the save root
//! 3. Every other row is mapped to a destination and a CDN URL and fetched,
//!    at most `batch_size` (200) transfers at a time
//! 4. Downloaded `.lz4` files are decoded next to their source
//!
//! Individual failures are logged and counted; only configuration and index
//! problems abort a run.
//!
//! ## Quick Start
//!
//! ```no_run
//! use asset_dl::{AssetDownloader, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config {
//!         base_url: "https://cdn.example.com/dl/resources/".to_string(),
//!         skip_existing: true,
//!         ..Default::default()
//!     };
//!     config.validate()?;
//!
//!     let downloader = AssetDownloader::new(config)?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let summary = downloader.run().await?;
//!     println!("{} downloaded, {} failed", summary.downloaded, summary.failed);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// LZ4 frame decoding of downloaded files
pub mod decompress;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// SQLite resource index
pub mod index;
/// URL and destination path resolution
pub mod resolve;
/// Single-blob transfers
pub mod transfer;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use downloader::AssetDownloader;
pub use error::{DecompressError, Error, IndexError, Result, TransferError};
pub use index::IndexReader;
pub use resolve::{EndpointRoute, PathResolver, UrlResolver};
pub use transfer::{BlobFetcher, HttpFetcher, TransferExecutor};
pub use types::{Event, PathStyle, Resolution, ResourceDescriptor, RunSummary, SkipReason};
