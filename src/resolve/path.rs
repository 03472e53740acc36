use crate::types::{DIRECTORY_MARKER_PREFIX, PathStyle, Resolution, SkipReason};
use std::path::{Path, PathBuf};

/// Maps logical index paths to destinations under the save root
#[derive(Clone, Debug)]
pub struct PathResolver {
    save_root: PathBuf,
    style: PathStyle,
}

impl PathResolver {
    /// Resolver rooted at `save_root` using the given host path style
    pub fn new(save_root: impl Into<PathBuf>, style: PathStyle) -> Self {
        Self {
            save_root: save_root.into(),
            style,
        }
    }

    /// Root every destination is placed under
    pub fn save_root(&self) -> &Path {
        &self.save_root
    }

    /// Destination for a downloadable descriptor, creating its parent folder.
    ///
    /// Folder creation is idempotent, so resolving the same path twice yields the
    /// same destination without error. Filesystem failures become a skip.
    pub fn resolve(&self, logical_path: &str) -> Resolution<PathBuf> {
        let normalized = self.relative(logical_path);
        if normalized.is_empty() {
            return Resolution::Skip(SkipReason::EmptyPath);
        }
        let Some(index) = normalized.rfind(self.style.separator) else {
            return Resolution::Ready(self.save_root.join(&normalized));
        };

        let (dir, filename) = (&normalized[..index], &normalized[index + 1..]);
        let folder = self.save_root.join(dir);

        if !folder.is_dir()
            && let Err(e) = std::fs::create_dir_all(&folder)
        {
            tracing::warn!(
                logical_path = %logical_path,
                folder = ?folder,
                error = %e,
                "Failed to create destination folder, skipping"
            );
            return Resolution::Skip(SkipReason::Filesystem {
                path: folder,
                message: e.to_string(),
            });
        }

        Resolution::Ready(folder.join(filename))
    }

    /// Folder materialized for a directory marker (`//name/`)
    pub fn marker_dir(&self, logical_path: &str) -> PathBuf {
        let stripped = logical_path
            .strip_prefix(DIRECTORY_MARKER_PREFIX)
            .unwrap_or(logical_path);
        let normalized = self.style.normalize(stripped);
        self.save_root
            .join(normalized.trim_matches(self.style.separator))
    }

    /// Create the folder for a directory marker
    pub fn create_marker_dir(&self, logical_path: &str) -> std::io::Result<PathBuf> {
        let dir = self.marker_dir(logical_path);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Destination of a logical path without touching the filesystem
    pub fn locate(&self, logical_path: &str) -> PathBuf {
        self.save_root.join(self.relative(logical_path))
    }

    /// Host-separated logical path with leading separators removed, so joining
    /// it onto the save root can never replace the root.
    fn relative(&self, logical_path: &str) -> String {
        let normalized = self.style.normalize(logical_path);
        normalized
            .trim_start_matches(self.style.separator)
            .to_string()
    }
}

/// Write target for `destination`, nesting one level deeper when a directory
/// of the same name already occupies it: `dest` becomes `dest/<last segment>`.
pub fn collision_safe_target(destination: &Path) -> PathBuf {
    if destination.is_dir()
        && let Some(name) = destination.file_name()
    {
        return destination.join(name);
    }
    destination.to_path_buf()
}
