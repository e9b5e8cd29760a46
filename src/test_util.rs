//! Shared test fixtures.

use std::path::Path;

/// Scratch directory under the system temp dir, removed on drop.
pub(crate) struct TempDir(tempfile::TempDir);

impl TempDir {
    pub(crate) fn new(tag: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("molviz-{tag}-"))
            .tempdir()
            .unwrap();
        Self(dir)
    }

    pub(crate) fn path(&self) -> &Path {
        self.0.path()
    }

    /// Write `contents` to `name`, creating parent directories.
    pub(crate) fn write(&self, name: &str, contents: &str) {
        let path = self.0.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, contents).unwrap();
    }

    pub(crate) fn mkdir(&self, name: &str) {
        std::fs::create_dir_all(self.0.path().join(name)).unwrap();
    }
}
