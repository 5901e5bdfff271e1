use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{SvgsResult, ValidationError};
use crate::naming::to_pascal_case;
use crate::scanner::AssetRecord;
use crate::storage::{ComponentMetadata, SvgDatabase};

/// Work derived from comparing a scan with the database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<ComponentMetadata>,
    pub updated: Vec<ComponentMetadata>,
    pub deleted: Vec<ComponentMetadata>,
    /// Previous entries of updated icons that moved to another family or
    /// path. Their old output has to go before the new one is written.
    pub relocated: Vec<ComponentMetadata>,
}

impl ChangeSet {
    /// Added followed by updated
    pub fn to_convert(&self) -> Vec<ComponentMetadata> {
        self.added.iter().chain(&self.updated).cloned().collect()
    }

    pub fn to_delete(&self) -> &[ComponentMetadata] {
        &self.deleted
    }

    /// Families that lost an icon through a delete or a move
    pub fn vacated_families(&self) -> BTreeSet<&str> {
        self.deleted
            .iter()
            .chain(&self.relocated)
            .filter_map(|icon| icon.family.as_deref())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Classifies assets as added, updated or deleted by icon name and hash.
pub struct ChangeDetector<'a> {
    database: &'a SvgDatabase,
    suffix: String,
}

impl<'a> ChangeDetector<'a> {
    pub fn new(database: &'a SvgDatabase) -> Self {
        Self {
            database,
            suffix: String::new(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Diff `assets` against the loaded database.
    ///
    /// Duplicate names or contents within `assets` are collected and
    /// reported together; no change set is returned in that case.
    pub fn run(&self, assets: &[AssetRecord]) -> SvgsResult<ChangeSet> {
        let mut names: HashMap<&str, &AssetRecord> = HashMap::new();
        let mut hashes: HashMap<&str, &AssetRecord> = HashMap::new();
        let mut errors = Vec::new();
        let mut changes = ChangeSet::default();

        for asset in assets {
            let mut valid = true;

            if let Some(existing) = names.get(asset.icon_name.as_str()) {
                errors.push(format!(
                    "[Validation Error] Duplicate name \"{}\": Found at \"{}\" and \"{}\".",
                    asset.icon_name,
                    asset.path.display(),
                    existing.path.display()
                ));
                valid = false;
            }

            if let Some(existing) = hashes.get(asset.hash.as_str()) {
                errors.push(format!(
                    "[Validation Error] Duplicate content: Icon \"{}\" is identical to \"{}\".",
                    asset.path.display(),
                    existing.path.display()
                ));
                valid = false;
            }

            if !valid {
                continue;
            }

            names.insert(asset.icon_name.as_str(), asset);
            hashes.insert(asset.hash.as_str(), asset);

            let metadata = ComponentMetadata {
                icon_name: asset.icon_name.clone(),
                path: asset.path.clone(),
                hash: asset.hash.clone(),
                component_name: to_pascal_case(&asset.icon_name, &self.suffix),
                family: asset.family.clone(),
            };

            match self.database.get(&asset.icon_name)? {
                None => changes.added.push(metadata),
                Some(previous) if previous.hash != asset.hash => {
                    if previous.family != metadata.family
                        || previous.path != metadata.path
                        || previous.component_name != metadata.component_name
                    {
                        changes.relocated.push(previous);
                    }
                    changes.updated.push(metadata);
                }
                Some(_) => {}
            }
        }

        let seen: HashSet<&str> = names.keys().copied().collect();
        changes.deleted = self
            .database
            .get_all()?
            .into_iter()
            .filter(|icon| !seen.contains(icon.icon_name.as_str()))
            .collect();

        tracing::info!(
            "{} new, {} updated, {} deleted icons detected.",
            changes.added.len(),
            changes.updated.len(),
            changes.deleted.len()
        );

        if !errors.is_empty() {
            for error in &errors {
                tracing::error!("  - {}", error);
            }
            return Err(ValidationError { errors }.into());
        }

        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SvgsError;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn asset(name: &str, hash: &str) -> AssetRecord {
        AssetRecord {
            path: PathBuf::from(format!("{name}.svg")),
            hash: hash.to_string(),
            icon_name: name.to_string(),
            family: None,
        }
    }

    fn stored(name: &str, hash: &str) -> ComponentMetadata {
        ComponentMetadata {
            icon_name: name.to_string(),
            path: PathBuf::from(format!("{name}.svg")),
            hash: hash.to_string(),
            component_name: to_pascal_case(name, ""),
            family: None,
        }
    }

    fn database(entries: &[ComponentMetadata]) -> (TempDir, SvgDatabase) {
        let temp_dir = TempDir::new().unwrap();
        let db = SvgDatabase::new(temp_dir.path().join("db.json"));
        db.load().unwrap();
        for entry in entries {
            db.upsert(entry.clone()).unwrap();
        }
        (temp_dir, db)
    }

    #[test]
    fn test_changed_hash_is_updated() {
        let (_dir, db) = database(&[stored("x", "h0")]);

        let changes = ChangeDetector::new(&db).run(&[asset("x", "h1")]).unwrap();

        assert_eq!(changes.to_convert(), vec![stored("x", "h1")]);
        assert!(changes.to_delete().is_empty());
        assert_eq!(changes.updated.len(), 1);
    }

    #[test]
    fn test_missing_asset_is_deleted() {
        let (_dir, db) = database(&[stored("x", "h0")]);

        let changes = ChangeDetector::new(&db).run(&[]).unwrap();

        assert!(changes.to_convert().is_empty());
        assert_eq!(changes.to_delete(), &[stored("x", "h0")]);
    }

    #[test]
    fn test_classification() {
        let (_dir, db) = database(&[stored("same", "s"), stored("changed", "c0"), stored("gone", "g")]);

        let changes = ChangeDetector::new(&db)
            .with_suffix("Icon")
            .run(&[asset("same", "s"), asset("changed", "c1"), asset("fresh", "f")])
            .unwrap();

        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].component_name, "FreshIcon");
        assert_eq!(changes.updated[0].icon_name, "changed");
        assert_eq!(changes.deleted, vec![stored("gone", "g")]);
    }

    #[test]
    fn test_moved_and_edited_keeps_previous_location() {
        let mut previous = stored("home", "h0");
        previous.family = Some("nav".to_string());
        previous.path = PathBuf::from("nav/home.svg");
        let (_dir, db) = database(&[previous.clone()]);

        let mut moved = asset("home", "h1");
        moved.family = Some("app".to_string());
        moved.path = PathBuf::from("app/home.svg");

        let changes = ChangeDetector::new(&db).run(&[moved]).unwrap();

        assert_eq!(changes.updated.len(), 1);
        assert_eq!(changes.updated[0].family.as_deref(), Some("app"));
        assert!(changes.deleted.is_empty());
        assert_eq!(changes.relocated, vec![previous]);
        assert_eq!(changes.vacated_families(), BTreeSet::from(["nav"]));
    }

    #[test]
    fn test_edit_in_place_is_not_relocated() {
        let (_dir, db) = database(&[stored("home", "h0")]);

        let changes = ChangeDetector::new(&db).run(&[asset("home", "h1")]).unwrap();

        assert_eq!(changes.updated.len(), 1);
        assert!(changes.relocated.is_empty());
    }

    #[test]
    fn test_unchanged_run_is_empty() {
        let (_dir, db) = database(&[stored("home", "h")]);

        let changes = ChangeDetector::new(&db).run(&[asset("home", "h")]).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_collects_every_validation_error() {
        let (_dir, db) = database(&[]);
        let mut twin = asset("home", "other");
        twin.path = PathBuf::from("app/home.svg");

        let error = ChangeDetector::new(&db)
            .run(&[asset("home", "h"), twin, asset("copy", "h")])
            .unwrap_err();

        match error {
            SvgsError::Validation(ValidationError { errors }) => {
                assert_eq!(errors.len(), 2);
                assert!(errors[0].contains("Duplicate name \"home\""));
                assert!(errors[0].contains("app/home.svg"));
                assert!(errors[1].contains("Duplicate content"));
                assert!(errors[1].contains("copy.svg"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
