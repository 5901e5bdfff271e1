use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{DuplicateError, SvgsResult};

#[derive(Default)]
struct Entries {
    names: HashMap<String, PathBuf>,
    contents: HashMap<String, PathBuf>,
}

/// Name and content uniqueness for a single build pass.
///
/// Each check-and-register happens under one lock, so two workers can never
/// both pass the same uniqueness check.
#[derive(Default)]
pub struct DuplicateRegistry {
    inner: Mutex<Entries>,
}

impl DuplicateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_and_register_name(&self, name: &str, path: &Path) -> SvgsResult<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = inner.names.get(name) {
            return Err(DuplicateError::Name {
                name: name.to_string(),
                existing: existing.clone(),
                new: path.to_path_buf(),
            }
            .into());
        }

        inner.names.insert(name.to_string(), path.to_path_buf());
        Ok(())
    }

    pub fn check_and_register_content(&self, hash: &str, path: &Path) -> SvgsResult<()> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = inner.contents.get(hash) {
            return Err(DuplicateError::Content {
                existing: existing.clone(),
                new: path.to_path_buf(),
            }
            .into());
        }

        inner.contents.insert(hash.to_string(), path.to_path_buf());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
