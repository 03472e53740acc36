//! Core types for asset-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logical-path prefix that marks a folder-only index entry
pub const DIRECTORY_MARKER_PREFIX: &str = "//";

/// Suffix of index entries that are decompressed after download
pub const LZ4_SUFFIX: &str = ".lz4";

/// One row of the index naming a remote blob
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Path of the blob relative to the save root, always `/`-separated
    pub logical_path: String,
    /// Content hash; its first two characters shard the download URL
    pub content_hash: String,
    /// Category that selects the endpoint route
    pub category: String,
}

impl ResourceDescriptor {
    /// Create a descriptor from its three index columns
    pub fn new(
        logical_path: impl Into<String>,
        content_hash: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            logical_path: logical_path.into(),
            content_hash: content_hash.into(),
            category: category.into(),
        }
    }

    /// Folder-only entry that must never be downloaded
    pub fn is_directory_marker(&self) -> bool {
        self.logical_path.starts_with(DIRECTORY_MARKER_PREFIX)
    }

    /// Entry whose download is an LZ4 frame to decode afterwards
    pub fn is_compressed(&self) -> bool {
        self.logical_path.ends_with(LZ4_SUFFIX)
    }
}

/// Host path conventions, computed once at startup and passed to the path resolver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathStyle {
    /// Separator used on the host filesystem
    pub separator: char,
}

impl PathStyle {
    /// Path style of the platform this binary was built for
    pub fn host() -> Self {
        Self {
            separator: std::path::MAIN_SEPARATOR,
        }
    }

    /// Rewrite a `/`-separated logical path to the host separator
    pub fn normalize(&self, logical_path: &str) -> String {
        if self.separator == '/' {
            logical_path.to_string()
        } else {
            logical_path.replace('/', &self.separator.to_string())
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::host()
    }
}

/// Outcome of resolving a URL or path for one descriptor
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<T> {
    /// Resolution succeeded
    Ready(T),
    /// The descriptor cannot be processed and should be skipped
    Skip(SkipReason),
}

impl<T> Resolution<T> {
    /// Convert into an `Option`, dropping the skip reason
    pub fn ready(self) -> Option<T> {
        match self {
            Resolution::Ready(value) => Some(value),
            Resolution::Skip(_) => None,
        }
    }
}

/// Why a descriptor was skipped during resolution
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The content hash is too short to derive a URL shard
    #[error("content hash '{hash}' is shorter than 2 characters")]
    HashTooShort {
        /// The offending hash
        hash: String,
    },

    /// The logical path is empty
    #[error("logical path is empty")]
    EmptyPath,

    /// A filesystem operation failed while preparing the destination
    #[error("filesystem error at {path}: {message}")]
    Filesystem {
        /// Path being prepared
        path: PathBuf,
        /// Underlying error text
        message: String,
    },
}

/// Counters reported at the end of a run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Descriptors in the index after de-duplication
    pub total: usize,
    /// Descriptors that went through the batch loop (markers excluded)
    pub processed: usize,
    /// Directory markers materialized
    pub directories: usize,
    /// Transfers that completed successfully
    pub downloaded: usize,
    /// Transfers that failed
    pub failed: usize,
    /// Descriptors skipped because the destination already existed
    pub skipped_existing: usize,
    /// Descriptors whose destination path could not be resolved
    pub unresolved: usize,
    /// `.lz4` files decoded
    pub decompressed: usize,
    /// `.lz4` files that could not be decoded
    pub decompress_failed: usize,
}

impl RunSummary {
    /// Transfers issued during the run
    pub fn transfers(&self) -> usize {
        self.downloaded + self.failed
    }
}

/// Events emitted during a run
///
/// Consumers subscribe via [`AssetDownloader::subscribe`](crate::AssetDownloader::subscribe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch was joined
    Progress {
        /// Non-marker descriptors processed so far
        completed: usize,
        /// Descriptors in the index
        total: usize,
    },

    /// A transfer failed
    TransferFailed {
        /// URL that was requested (empty when it could not be resolved)
        url: String,
        /// Destination that is now missing
        destination: PathBuf,
        /// Machine-readable failure code
        reason: String,
    },

    /// An `.lz4` file was decoded
    Decompressed {
        /// Compressed input
        source: PathBuf,
        /// Decoded output
        target: PathBuf,
    },

    /// The run reached its final report
    Finished(RunSummary),
}
