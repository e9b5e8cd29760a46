//! Frame file discovery and the [`FileIndex`] that the controller steps
//! through.
//!
//! Frame order is file-name order. Writers are expected to zero-pad frame
//! numbers so that lexicographic order is time order; nothing here looks
//! at file contents.

use std::path::{Path, PathBuf};

use crate::error::MolVizError;

/// Ordered frame files of one directory plus the playback window.
///
/// Invariant (non-empty index): `start <= current <= stop <= len - 1` and
/// `step != 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileIndex {
    dir: PathBuf,
    names: Vec<String>,
    start: usize,
    stop: usize,
    step: i64,
    current: usize,
}

impl Default for FileIndex {
    fn default() -> Self {
        Self::new(PathBuf::new(), Vec::new())
    }
}

impl FileIndex {
    /// Index over `names` (already sorted) with the full range selected.
    #[must_use]
    pub fn new(dir: PathBuf, names: Vec<String>) -> Self {
        let stop = names.len().saturating_sub(1);
        Self {
            dir,
            names,
            start: 0,
            stop,
            step: 1,
            current: 0,
        }
    }

    /// Directory the names are relative to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All file names in frame order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// File name at `index`.
    #[must_use]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Full path of the file at `index`.
    #[must_use]
    pub fn path(&self, index: usize) -> Option<PathBuf> {
        self.name(index).map(|n| self.dir.join(n))
    }

    /// Number of frame files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory held no frame files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// First index of the playback window.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last index of the playback window.
    #[must_use]
    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Signed step used by next/previous.
    #[must_use]
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Current index pointer.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Clamp `target` into `[start, stop]`. `None` when there are no files.
    #[must_use]
    pub fn clamp(&self, target: i64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(target.clamp(self.start as i64, self.stop as i64) as usize)
    }

    /// Clamped target `delta` frames away from the current index.
    #[must_use]
    pub fn offset(&self, delta: i64) -> Option<usize> {
        self.clamp((self.current as i64).saturating_add(delta))
    }

    /// Move the current pointer to `index`, clamped. Returns where it landed.
    pub fn set_current(&mut self, index: i64) -> Option<usize> {
        let landed = self.clamp(index)?;
        self.current = landed;
        Some(landed)
    }

    /// Narrow the playback window. The current pointer is re-clamped.
    pub fn set_range(
        &mut self,
        start: usize,
        stop: usize,
    ) -> Result<(), MolVizError> {
        if self.is_empty() {
            return Err(MolVizError::InvalidRange(
                "no frame files loaded".to_owned(),
            ));
        }
        if start > stop || stop >= self.len() {
            return Err(MolVizError::InvalidRange(format!(
                "[{start}, {stop}] outside [0, {}]",
                self.len() - 1
            )));
        }
        self.start = start;
        self.stop = stop;
        self.current = self.current.clamp(start, stop);
        Ok(())
    }

    /// Set the signed step used by next/previous. Zero is rejected.
    pub fn set_step(&mut self, step: i64) -> Result<(), MolVizError> {
        if step == 0 {
            return Err(MolVizError::InvalidRange(
                "step must be non-zero".to_owned(),
            ));
        }
        self.step = step;
        Ok(())
    }
}

/// Directory to scan for `path`: itself if it is a directory, otherwise
/// its parent (a selected file stands for the directory holding it).
#[must_use]
pub fn resolve_directory(path: &Path) -> PathBuf {
    if path.is_dir() {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Scan the directory for `path` and build a fresh [`FileIndex`] with
/// `start = 0`, `stop = len - 1`, `step = 1`, `current = 0`.
///
/// Regular files only; hidden (dot) files and names that are not UTF-8
/// are skipped.
pub fn discover(path: &Path) -> Result<FileIndex, MolVizError> {
    let dir = resolve_directory(path);
    let entries =
        std::fs::read_dir(&dir).map_err(|e| MolVizError::from_io(&dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MolVizError::from_io(&dir, e))?;
        let entry_path = entry.path();
        if !entry_path.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            log::warn!("skipping non UTF-8 file name in {}", dir.display());
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();

    log::info!("found {} frame files in {}", names.len(), dir.display());
    Ok(FileIndex::new(dir, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::TempDir;

    fn index(n: usize) -> FileIndex {
        FileIndex::new(
            PathBuf::from("d"),
            (0..n).map(|i| format!("{i:04}")).collect(),
        )
    }

    #[test]
    fn discover_sorts_and_resets() {
        let dir = TempDir::new("discover_sorts");
        for name in ["0003", "0001", "0010", "0002"] {
            dir.write(name, "");
        }
        dir.write(".hidden", "");
        dir.mkdir("sub");

        let idx = discover(dir.path()).unwrap();
        assert_eq!(idx.names(), &["0001", "0002", "0003", "0010"]);
        assert_eq!((idx.start(), idx.stop(), idx.step()), (0, 3, 1));
        assert_eq!(idx.current(), 0);
        assert_eq!(idx.dir(), dir.path());
    }

    #[test]
    fn selected_file_resolves_to_its_directory() {
        let dir = TempDir::new("discover_file");
        dir.write("a", "");
        dir.write("b", "");

        let idx = discover(&dir.path().join("b")).unwrap();
        assert_eq!(idx.names(), &["a", "b"]);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err =
            discover(Path::new("/definitely/not/here/frames/0001")).unwrap_err();
        assert!(matches!(err, MolVizError::NotFound(_)));
    }

    #[test]
    fn bare_file_name_resolves_to_cwd() {
        assert_eq!(
            resolve_directory(Path::new("no-such-frame-file")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn clamp_respects_window() {
        let mut idx = index(10);
        idx.set_range(2, 5).unwrap();
        assert_eq!(idx.clamp(-4), Some(2));
        assert_eq!(idx.clamp(4), Some(4));
        assert_eq!(idx.clamp(99), Some(5));
        assert_eq!(idx.current(), 2);
    }

    #[test]
    fn empty_index_has_no_targets() {
        let mut idx = index(0);
        assert_eq!(idx.clamp(0), None);
        assert_eq!(idx.set_current(3), None);
        assert!(idx.set_range(0, 0).is_err());
    }

    #[test]
    fn range_and_step_validation() {
        let mut idx = index(4);
        assert!(idx.set_range(3, 2).is_err());
        assert!(idx.set_range(0, 4).is_err());
        assert!(idx.set_step(0).is_err());
        idx.set_step(-2).unwrap();
        assert_eq!(idx.step(), -2);
    }

    #[test]
    fn offset_saturates_at_bounds() {
        let mut idx = index(5);
        let _ = idx.set_current(4);
        assert_eq!(idx.offset(1), Some(4));
        assert_eq!(idx.offset(i64::MAX), Some(4));
        assert_eq!(idx.offset(-10), Some(0));
    }
}
