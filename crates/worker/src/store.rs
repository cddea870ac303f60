//! Per-workcenter image store with idempotent writes.

use std::io;
use std::path::{Path, PathBuf};

/// Filesystem store rooted at the inspections directory.
///
/// Layout: `<root>/<workcenter name>/<file id>.jpg`. Writes are
/// skip-if-exists: an image already on disk is never re-rendered or
/// overwritten.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root of the stored tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a workcenter's images.
    pub fn workcenter_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Target path for one annotated image.
    pub fn image_path(&self, workcenter_name: &str, file_id: &str) -> PathBuf {
        self.workcenter_dir(workcenter_name)
            .join(format!("{file_id}.jpg"))
    }

    /// Create a directory (and parents) if it does not exist yet.
    pub fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            tracing::debug!(dir = %dir.display(), "Created workcenter directory");
        }
        Ok(())
    }

    /// Write `bytes` to `path` unless the file already exists.
    ///
    /// Returns `true` if the file was written, `false` if it was already
    /// present (in which case the existing content is left untouched).
    pub fn write_if_absent(&self, path: &Path, bytes: &[u8]) -> io::Result<bool> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "Image already stored, skipping");
            return Ok(false);
        }
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), "Stored annotated image");
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_path_nests_under_workcenter_dir() {
        let store = Store::new("/data/Inspections");
        assert_eq!(
            store.image_path("Line A", "abc123"),
            PathBuf::from("/data/Inspections/Line A/abc123.jpg")
        );
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let dir = store.workcenter_dir("Line A");

        store.ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Second call on an existing directory is a no-op.
        store.ensure_dir(&dir).unwrap();
    }

    #[test]
    fn write_if_absent_writes_once_and_preserves_content() {
        let tmp = tempfile::tempdir().unwrap();
        let store = Store::new(tmp.path());
        let dir = store.workcenter_dir("Line A");
        store.ensure_dir(&dir).unwrap();
        let path = store.image_path("Line A", "f1");

        assert!(store.write_if_absent(&path, b"first").unwrap());
        assert!(!store.write_if_absent(&path, b"second").unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"first");
    }
}
