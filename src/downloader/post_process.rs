//! Post-download pass: decode every `.lz4` output, one file at a time.

use crate::decompress::decompress_lz4;
use crate::resolve::collision_safe_target;
use crate::types::{Event, ResourceDescriptor, RunSummary};

use super::AssetDownloader;

impl AssetDownloader {
    /// Decompress each `.lz4` descriptor's download into its sibling file.
    ///
    /// Runs strictly after every transfer has been joined. Failures are logged
    /// and counted; they never abort the run.
    pub(super) async fn decompress_outputs(
        &self,
        descriptors: &[ResourceDescriptor],
        summary: &mut RunSummary,
    ) {
        for descriptor in descriptors.iter().filter(|d| d.is_compressed()) {
            let source = collision_safe_target(&self.paths.locate(&descriptor.logical_path));
            let source_for_task = source.clone();

            let result =
                tokio::task::spawn_blocking(move || decompress_lz4(&source_for_task)).await;

            match result {
                Ok(Ok(target)) => {
                    tracing::info!(
                        logical_path = %descriptor.logical_path,
                        target = ?target,
                        "{} has been decoded",
                        descriptor.logical_path
                    );
                    summary.decompressed += 1;
                    self.event_tx
                        .send(Event::Decompressed { source, target })
                        .ok();
                }
                Ok(Err(e)) => {
                    tracing::error!(
                        logical_path = %descriptor.logical_path,
                        error = %e,
                        "Failed to decode lz4 file"
                    );
                    summary.decompress_failed += 1;
                }
                Err(e) => {
                    tracing::error!(
                        logical_path = %descriptor.logical_path,
                        error = %e,
                        "Decode task panicked"
                    );
                    summary.decompress_failed += 1;
                }
            }
        }
    }
}
