//! Output layout strategies.

use std::path::PathBuf;

use crate::error::{BuildError, SvgsResult};
use crate::scanner::{AssetRecord, ScanMode};

/// Folder holding generated components inside a family (or the target root)
pub const COMPONENTS_DIR: &str = "components";

/// Decides which family an asset is exported under.
pub trait Layout: Send + Sync {
    fn name(&self) -> &'static str;

    fn scan_mode(&self) -> ScanMode;

    /// Family the component is grouped under, `None` for a flat export.
    fn family_for(&self, asset: &AssetRecord) -> SvgsResult<Option<String>>;
}

/// Every icon lands in `<root>/components/`, folders are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standalone;

impl Layout for Standalone {
    fn name(&self) -> &'static str {
        "standalone"
    }

    fn scan_mode(&self) -> ScanMode {
        ScanMode::Recursive
    }

    fn family_for(&self, _asset: &AssetRecord) -> SvgsResult<Option<String>> {
        Ok(None)
    }
}

/// Icons are grouped by their folder: `<root>/<family>/components/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Family;

impl Layout for Family {
    fn name(&self) -> &'static str {
        "family"
    }

    fn scan_mode(&self) -> ScanMode {
        ScanMode::Family
    }

    fn family_for(&self, asset: &AssetRecord) -> SvgsResult<Option<String>> {
        match &asset.family {
            Some(family) => Ok(Some(family.clone())),
            None => Err(BuildError::MissingFamily {
                file: asset.path.to_string_lossy().into_owned(),
            }
            .into()),
        }
    }
}

/// Directory of a component relative to a target root.
pub fn component_dir(family: Option<&str>) -> PathBuf {
    match family {
        Some(family) => PathBuf::from(family).join(COMPONENTS_DIR),
        None => PathBuf::from(COMPONENTS_DIR),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SvgsError;
    use std::path::Path;

    fn record(path: &str, family: Option<&str>) -> AssetRecord {
        AssetRecord {
            path: PathBuf::from(path),
            hash: "h".to_string(),
            icon_name: "home".to_string(),
            family: family.map(str::to_string),
        }
    }

    #[test]
    fn test_standalone_flattens_folders() {
        let family = Standalone.family_for(&record("nav/home.svg", Some("nav"))).unwrap();
        assert_eq!(family, None);
        assert_eq!(component_dir(None), Path::new("components"));
    }

    #[test]
    fn test_family_requires_folder() {
        let family = Family.family_for(&record("nav/home.svg", Some("nav"))).unwrap();
        assert_eq!(family.as_deref(), Some("nav"));
        assert_eq!(component_dir(family.as_deref()), Path::new("nav/components"));

        let result = Family.family_for(&record("home.svg", None));
        match result {
            Err(SvgsError::Build(BuildError::MissingFamily { file })) => assert_eq!(file, "home.svg"),
            other => panic!("expected MissingFamily, got {:?}", other),
        }
    }
}
