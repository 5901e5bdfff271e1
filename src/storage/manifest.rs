use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::atomic::{atomic_write, is_within};
use crate::error::{ErrorContext, SvgsError, SvgsResult};

pub const MANIFEST_FILENAME: &str = ".svgs-manifest.json";

/// Files written by the previous generation run.
///
/// Only paths inside the output root are ever removed, whatever the
/// manifest on disk says.
pub struct ManifestStore {
    path: PathBuf,
    output_root: PathBuf,
    generated: Mutex<BTreeSet<PathBuf>>,
}

impl ManifestStore {
    pub fn new(output_root: impl AsRef<Path>) -> Self {
        let output_root = output_root.as_ref().to_path_buf();
        let path = output_root.join(MANIFEST_FILENAME);

        Self {
            path,
            output_root,
            generated: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a file written during this run.
    pub fn track(&self, file: impl Into<PathBuf>) {
        self.generated
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(file.into());
    }

    pub fn tracked(&self) -> Vec<PathBuf> {
        self.generated
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Paths listed by the previous run, or `None` when there is no usable manifest.
    pub fn load_previous(&self) -> Option<Vec<PathBuf>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read manifest {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<PathBuf>>(&content) {
            Ok(paths) => Some(paths),
            Err(e) => {
                tracing::warn!("Ignoring unreadable manifest {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Delete the files listed by the previous run that lie inside the
    /// output root. Returns the number of files removed.
    pub fn clean(&self) -> SvgsResult<usize> {
        let Some(previous) = self.load_previous() else {
            tracing::debug!("No manifest found or failed to read. Skipping clean.");
            return Ok(0);
        };

        let mut removed = 0;
        for path in previous {
            if !is_within(&path, &self.output_root) {
                tracing::warn!(
                    "Refusing to delete {} outside of {}",
                    path.display(),
                    self.output_root.display()
                );
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove {}", path.display()))
                }
            }
        }

        tracing::debug!("Cleaned up {} files from manifest.", removed);
        Ok(removed)
    }

    /// Persist every path tracked during this run.
    pub fn save(&self) -> SvgsResult<()> {
        let paths = self.tracked();
        let content = serde_json::to_string_pretty(&paths)
            .map_err(|e| SvgsError::InvalidInput(format!("Failed to serialize manifest: {}", e)))?;
        atomic_write(&self.path, &content)
    }
}
