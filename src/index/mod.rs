//! Descriptor index reader
//!
//! The index is a SQLite file whose table `a` lists every blob as
//! `(n = logical path, h = content hash, m = category)`. It is opened
//! read-only and fully materialized before any transfer starts.

use crate::error::{Error, IndexError, Result};
use crate::types::ResourceDescriptor;
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// Query listing every blob in index order
const LIST_ALL_QUERY: &str = "SELECT n, h, m FROM a";

/// Raw index row (column names are fixed by the index format)
#[derive(Debug, Clone, FromRow)]
struct IndexRow {
    n: Option<String>,
    h: Option<String>,
    m: Option<String>,
}

/// Read-only handle on the descriptor index
pub struct IndexReader {
    pool: SqlitePool,
}

impl IndexReader {
    /// Open the index at `path` without creating or modifying it
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IndexError::NotFound(path.to_path_buf()).into());
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))
            .map_err(|e| {
                Error::Index(IndexError::ConnectionFailed(format!(
                    "Failed to parse index path: {}",
                    e
                )))
            })?
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePool::connect_with(options).await.map_err(|e| {
            Error::Index(IndexError::ConnectionFailed(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        })?;

        Ok(Self { pool })
    }

    /// Every descriptor in the index, in table order.
    ///
    /// Duplicates are kept; [`dedupe_logical_paths`] runs once per run in the
    /// batch loop.
    pub async fn list_all(&self) -> Result<Vec<ResourceDescriptor>> {
        let rows: Vec<IndexRow> = sqlx::query_as(LIST_ALL_QUERY)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                Error::Index(IndexError::QueryFailed(format!(
                    "Failed to list descriptors: {}",
                    e
                )))
            })?;

        let mut descriptors = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(logical_path) = row.n else {
                tracing::warn!("Index row without a logical path, ignoring");
                continue;
            };
            descriptors.push(ResourceDescriptor {
                logical_path,
                content_hash: row.h.unwrap_or_default(),
                category: row.m.unwrap_or_default(),
            });
        }

        tracing::debug!(count = descriptors.len(), "Loaded descriptors from index");
        Ok(descriptors)
    }

    /// Close the underlying connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Underlying pool, for tests
    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Drop later descriptors that repeat an earlier logical path.
///
/// Each transfer owns its destination file; two entries with the same logical
/// path would race on one file, so only the first occurrence is kept.
pub fn dedupe_logical_paths(descriptors: Vec<ResourceDescriptor>) -> Vec<ResourceDescriptor> {
    let mut seen = HashSet::with_capacity(descriptors.len());
    let mut unique = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if seen.contains(&descriptor.logical_path) {
            tracing::warn!(
                logical_path = %descriptor.logical_path,
                hash = %descriptor.content_hash,
                "Duplicate logical path in index, keeping first entry"
            );
            continue;
        }
        seen.insert(descriptor.logical_path.clone());
        unique.push(descriptor);
    }

    unique
}
