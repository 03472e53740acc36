//! The batch loop: directory markers, skip checks and bounded transfer batches.
//!
//! Transfers are launched in groups of at most `batch_size` and each group is
//! joined in full before the next one is admitted, so no more than
//! `batch_size` transfers are ever outstanding.

use std::future::Future;
use std::path::PathBuf;

use futures::future::join_all;

use crate::error::Result;
use crate::index::dedupe_logical_paths;
use crate::types::{Event, Resolution, ResourceDescriptor, RunSummary};

use super::AssetDownloader;

/// What the loop decided for one non-marker descriptor.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Admission {
    /// Queue a transfer into this destination
    Transfer(PathBuf),
    /// Destination already exists and `skip_existing` is set
    SkipExisting,
    /// Destination could not be resolved
    Unresolved,
}

impl AssetDownloader {
    /// Download every descriptor, then decompress `.lz4` outputs.
    pub async fn run_descriptors(&self, descriptors: Vec<ResourceDescriptor>) -> Result<RunSummary> {
        let descriptors = dedupe_logical_paths(descriptors);
        let batch_size = self.config.batch_size.max(1);

        tokio::fs::create_dir_all(self.paths.save_root()).await?;

        tracing::info!(
            total = descriptors.len(),
            save_root = ?self.paths.save_root(),
            batch_size,
            "Starting download"
        );
        if self.config.skip_existing {
            tracing::info!("Skipping existing files");
        }

        let mut summary = RunSummary {
            total: descriptors.len(),
            ..RunSummary::default()
        };
        let mut batch = Vec::with_capacity(batch_size);

        for descriptor in &descriptors {
            if descriptor.is_directory_marker() {
                self.create_marker_dir(descriptor, &mut summary);
                continue;
            }

            summary.processed += 1;
            match self.admit(descriptor) {
                Admission::Transfer(destination) => {
                    batch.push(self.transfer(descriptor, destination));
                }
                Admission::SkipExisting => summary.skipped_existing += 1,
                Admission::Unresolved => summary.unresolved += 1,
            }

            if batch.len() >= batch_size {
                let outcomes = join_all(batch.drain(..)).await;
                tally(&outcomes, &mut summary);
                self.report_progress(&summary);
            }
        }

        if !batch.is_empty() {
            let outcomes = join_all(batch.drain(..)).await;
            tally(&outcomes, &mut summary);
            self.report_progress(&summary);
        }

        self.decompress_outputs(&descriptors, &mut summary).await;

        tracing::info!(
            downloaded = summary.downloaded,
            failed = summary.failed,
            skipped_existing = summary.skipped_existing,
            unresolved = summary.unresolved,
            directories = summary.directories,
            decompressed = summary.decompressed,
            decompress_failed = summary.decompress_failed,
            "Run finished"
        );
        self.event_tx.send(Event::Finished(summary.clone())).ok();

        Ok(summary)
    }

    /// Decide whether a non-marker descriptor needs a transfer.
    pub(super) fn admit(&self, descriptor: &ResourceDescriptor) -> Admission {
        let destination = match self.paths.resolve(&descriptor.logical_path) {
            Resolution::Ready(path) => path,
            Resolution::Skip(reason) => {
                tracing::warn!(
                    logical_path = %descriptor.logical_path,
                    reason = %reason,
                    "Could not resolve destination, skipping"
                );
                return Admission::Unresolved;
            }
        };

        if self.config.skip_existing && destination.is_file() {
            tracing::debug!(destination = ?destination, "Destination exists, skipping");
            return Admission::SkipExisting;
        }

        Admission::Transfer(destination)
    }

    /// Transfer future for one descriptor; does nothing until the batch is joined.
    fn transfer<'a>(
        &'a self,
        descriptor: &'a ResourceDescriptor,
        destination: PathBuf,
    ) -> impl Future<Output = bool> + 'a {
        async move {
            self.executor
                .download(&descriptor.content_hash, &descriptor.category, &destination)
                .await
        }
    }

    fn create_marker_dir(&self, descriptor: &ResourceDescriptor, summary: &mut RunSummary) {
        match self.paths.create_marker_dir(&descriptor.logical_path) {
            Ok(dir) => {
                tracing::debug!(dir = ?dir, "Created directory");
                summary.directories += 1;
            }
            Err(e) => {
                tracing::warn!(
                    logical_path = %descriptor.logical_path,
                    error = %e,
                    "Failed to create directory"
                );
            }
        }
    }

    fn report_progress(&self, summary: &RunSummary) {
        // Markers count toward the total but not toward completed files
        let completed = summary.processed;
        tracing::info!("Completed {} of {} files", completed, summary.total);
        self.event_tx
            .send(Event::Progress {
                completed,
                total: summary.total,
            })
            .ok();
    }
}

/// Fold one joined batch into the run counters.
fn tally(outcomes: &[bool], summary: &mut RunSummary) {
    for &ok in outcomes {
        if ok {
            summary.downloaded += 1;
        } else {
            summary.failed += 1;
        }
    }
}
