use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::atomic::atomic_write;
use crate::error::{DatabaseError, ErrorContext, SvgsResult};

pub const DEFAULT_DATABASE_FILENAME: &str = ".svgs-cache.json";

/// Persisted record for one icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub icon_name: String,
    /// Path of the source relative to the assets root
    pub path: PathBuf,
    pub hash: String,
    pub component_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// What a call to [`SvgDatabase::save`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing changed since the last load or save
    Clean,
    /// Another save was still writing
    InFlight,
}

#[derive(Default)]
struct Table {
    icons: BTreeMap<String, ComponentMetadata>,
    revision: u64,
    saved_revision: u64,
}

impl Table {
    fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// JSON-backed icon table keyed by icon name.
///
/// The file is an association list of `[iconName, metadata]` pairs sorted by
/// name, so diffs stay small under version control.
pub struct SvgDatabase {
    path: PathBuf,
    table: Mutex<Option<Table>>,
    pub(crate) saving: AtomicBool,
}

struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SvgDatabase {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            table: Mutex::new(None),
            saving: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the backing file. A missing file starts an empty table; an
    /// unparsable one is an error.
    pub fn load(&self) -> SvgsResult<()> {
        let icons = match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let pairs: Vec<(String, ComponentMetadata)> = serde_json::from_str(&raw)
                    .map_err(|source| DatabaseError::Corrupted {
                        path: self.path.clone(),
                        source,
                    })?;
                pairs.into_iter().collect()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Database file not found at {}, starting fresh.",
                    self.path.display()
                );
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read database {}", self.path.display()))
            }
        };

        *self.lock() = Some(Table {
            icons,
            ..Table::default()
        });
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    pub fn get(&self, icon_name: &str) -> SvgsResult<Option<ComponentMetadata>> {
        self.with_table(|table| table.icons.get(icon_name).cloned())
    }

    pub fn get_all(&self) -> SvgsResult<Vec<ComponentMetadata>> {
        self.with_table(|table| table.icons.values().cloned().collect())
    }

    pub fn len(&self) -> SvgsResult<usize> {
        self.with_table(|table| table.icons.len())
    }

    pub fn is_dirty(&self) -> SvgsResult<bool> {
        self.with_table(|table| table.is_dirty())
    }

    pub fn upsert(&self, meta: ComponentMetadata) -> SvgsResult<()> {
        self.with_table(|table| {
            match table.icons.get(&meta.icon_name) {
                None => tracing::info!("Adding new icon '{}'", meta.icon_name),
                Some(existing) if existing.hash != meta.hash => {
                    tracing::info!("Updating icon '{}'", meta.icon_name)
                }
                Some(_) => {}
            }
            table.icons.insert(meta.icon_name.clone(), meta);
            table.touch();
        })
    }

    /// Remove an icon. Returns whether anything was removed.
    pub fn delete(&self, icon_name: &str) -> SvgsResult<bool> {
        self.with_table(|table| {
            if table.icons.remove(icon_name).is_some() {
                tracing::info!("Deleting icon '{}'", icon_name);
                table.touch();
                true
            } else {
                false
            }
        })
    }

    /// Write the table if anything changed since the last load or save.
    pub fn save(&self) -> SvgsResult<SaveOutcome> {
        if self.saving.swap(true, Ordering::AcqRel) {
            return Ok(SaveOutcome::InFlight);
        }
        let _guard = SavingGuard(&self.saving);

        let snapshot = self.with_table(|table| {
            table.is_dirty().then(|| {
                let pairs: Vec<(String, ComponentMetadata)> = table
                    .icons
                    .iter()
                    .map(|(name, meta)| (name.clone(), meta.clone()))
                    .collect();
                (pairs, table.revision)
            })
        })?;

        let Some((pairs, revision)) = snapshot else {
            tracing::info!("No changes to save.");
            return Ok(SaveOutcome::Clean);
        };

        let content = serde_json::to_string_pretty(&pairs).map_err(DatabaseError::Serialize)?;
        atomic_write(&self.path, &content)?;

        self.with_table(|table| {
            table.saved_revision = table.saved_revision.max(revision);
        })?;

        tracing::info!("Database saved to {} successfully.", self.path.display());
        Ok(SaveOutcome::Saved)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Table>> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn with_table<R>(&self, f: impl FnOnce(&mut Table) -> R) -> SvgsResult<R> {
        let mut guard = self.lock();
        let table = guard.as_mut().ok_or(DatabaseError::NotLoaded)?;
        Ok(f(table))
    }
}
