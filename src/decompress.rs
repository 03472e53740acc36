//! LZ4 frame decoding for downloaded `.lz4` blobs
//!
//! Each archive is stream-decoded into a sibling file with the `.lz4` suffix
//! stripped; the compressed source is left untouched.

use crate::error::DecompressError;
use crate::types::LZ4_SUFFIX;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Sibling path of `source` with the `.lz4` suffix removed
pub fn decoded_path(source: &Path) -> Option<PathBuf> {
    let name = source.file_name()?.to_str()?;
    let stem = name.strip_suffix(LZ4_SUFFIX)?;
    if stem.is_empty() {
        return None;
    }
    Some(source.with_file_name(stem))
}

/// Decode the LZ4 frame stream at `source` into its sibling path.
///
/// Blocking; call through `spawn_blocking` from async code. A partially written
/// output is removed when decoding fails.
pub fn decompress_lz4(source: &Path) -> Result<PathBuf, DecompressError> {
    let target =
        decoded_path(source).ok_or_else(|| DecompressError::NotCompressed(source.to_path_buf()))?;

    if !source.is_file() {
        return Err(DecompressError::SourceMissing(source.to_path_buf()));
    }

    debug!(?source, ?target, "decoding lz4 frame stream");

    let fail = |reason: String| DecompressError::DecodeFailed {
        source_path: source.to_path_buf(),
        target_path: target.clone(),
        reason,
    };

    let input = File::open(source).map_err(|e| fail(format!("open source: {e}")))?;
    let output = File::create(&target).map_err(|e| fail(format!("create target: {e}")))?;

    let mut decoder = lz4_flex::frame::FrameDecoder::new(BufReader::new(input));
    let mut writer = BufWriter::new(output);
    let copied = std::io::copy(&mut decoder, &mut writer).and_then(|n| writer.flush().map(|_| n));

    match copied {
        Ok(bytes) => {
            debug!(?target, bytes, "lz4 frame stream decoded");
            Ok(target)
        }
        Err(e) => {
            drop(writer);
            if let Err(remove_err) = std::fs::remove_file(&target) {
                debug!(?target, error = %remove_err, "failed to remove partial output");
            }
            Err(fail(e.to_string()))
        }
    }
}
