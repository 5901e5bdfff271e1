use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorContext, SvgsResult};

/// Atomic file writes: the target is either untouched or fully replaced
pub struct AtomicFile {
    path: PathBuf,
    temp_path: PathBuf,
}

impl AtomicFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let temp_path = Self::temp_path(&path);

        Self { path, temp_path }
    }

    /// Sibling temporary path used before the rename commit
    fn temp_path(path: &Path) -> PathBuf {
        let mut temp = path.as_os_str().to_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically write content to file
    pub fn write(&self, content: &[u8]) -> SvgsResult<()> {
        self.write_with(content, |from, to| fs::rename(from, to))
    }

    /// Same as [`AtomicFile::write`] with the commit step supplied by the caller.
    pub(crate) fn write_with<F>(&self, content: &[u8], commit: F) -> SvgsResult<()>
    where
        F: FnOnce(&Path, &Path) -> io::Result<()>,
    {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        if let Err(e) = self.write_temp(content) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(e).with_context(|| {
                format!("Failed to write temporary file {}", self.temp_path.display())
            });
        }

        // Rename is the commit point
        if let Err(e) = commit(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(e)
                .with_context(|| format!("Failed to atomically rename onto {}", self.path.display()));
        }

        Ok(())
    }

    fn write_temp(&self, content: &[u8]) -> io::Result<()> {
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.temp_path)?;

        temp_file.write_all(content)?;
        temp_file.sync_all()
    }
}

/// Write `content` to `path` without ever exposing a partially written file.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> SvgsResult<()> {
    AtomicFile::new(path).write(content.as_bytes())
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// Whether `path` lies inside `root`.
///
/// Existing paths are compared canonically so symlinks cannot escape the
/// root; missing paths fall back to a lexical comparison.
pub fn is_within(path: &Path, root: &Path) -> bool {
    let root = root
        .canonicalize()
        .unwrap_or_else(|_| normalize(root));

    let candidate = match path.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) => normalize(path),
    };

    candidate != root && candidate.starts_with(&root)
}
