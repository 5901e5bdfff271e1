//! Asset discovery.
//!
//! Walks the assets directory, validates every candidate and hashes the
//! survivors. Problems are split into warnings (skipped, non-fatal) and
//! errors (skipped, fatal once the scan is summarised).

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{ErrorContext, ScanError, SvgsResult};
use crate::naming;
use crate::pool::{worker_pool, DEFAULT_CONCURRENCY};

/// One discovered SVG source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Path relative to the assets root
    pub path: PathBuf,
    /// Hex-encoded SHA-256 of the file bytes
    pub hash: String,
    /// Kebab-case file stem
    pub icon_name: String,
    /// Containing folder relative to the assets root, `/`-separated
    pub family: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Every `.svg` at any depth
    #[default]
    Recursive,
    /// `assets/<family>/<icon>.svg`, one level of families
    Family,
}

/// Counts reported once a scan passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub assets: usize,
    pub warnings: usize,
}

struct Candidate {
    absolute: PathBuf,
    relative: PathBuf,
    icon_name: String,
    family: Option<String>,
}

pub struct AssetScanner {
    root: PathBuf,
    mode: ScanMode,
    concurrency: usize,
    records: Vec<AssetRecord>,
    warnings: Vec<String>,
    errors: Vec<String>,
    scanned: bool,
}

impl AssetScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            mode: ScanMode::default(),
            concurrency: DEFAULT_CONCURRENCY,
            records: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            scanned: false,
        }
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the assets root, replacing the results of any previous scan.
    pub fn scan(&mut self) -> SvgsResult<&[AssetRecord]> {
        if !self.root.is_dir() {
            return Err(ScanError::MissingRoot {
                path: self.root.clone(),
            }
            .into());
        }

        self.records.clear();
        self.warnings.clear();
        self.errors.clear();
        self.scanned = false;

        let candidates = match self.mode {
            ScanMode::Recursive => self.collect_recursive(),
            ScanMode::Family => self.collect_families()?,
        };

        let pool = worker_pool(self.concurrency)?;
        let records = pool.install(|| {
            candidates
                .par_iter()
                .map(|candidate| {
                    let hash = hash_file(&candidate.absolute)?;
                    Ok(AssetRecord {
                        path: candidate.relative.clone(),
                        hash,
                        icon_name: candidate.icon_name.clone(),
                        family: candidate.family.clone(),
                    })
                })
                .collect::<SvgsResult<Vec<_>>>()
        })?;

        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }
        tracing::debug!(
            "Scanned {} assets ({} warnings, {} errors)",
            records.len(),
            self.warnings.len(),
            self.errors.len()
        );

        self.records = records;
        self.scanned = true;
        Ok(&self.records)
    }

    pub fn records(&self) -> SvgsResult<&[AssetRecord]> {
        self.assert_scanned()?;
        Ok(&self.records)
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Fails before a completed scan, or when any error was collected.
    pub fn summary(&self) -> SvgsResult<ScanSummary> {
        self.assert_scanned()?;

        if !self.errors.is_empty() {
            for error in &self.errors {
                tracing::error!("{}", error);
            }
            return Err(ScanError::Invalid {
                errors: self.errors.clone(),
            }
            .into());
        }

        Ok(ScanSummary {
            assets: self.records.len(),
            warnings: self.warnings.len(),
        })
    }

    fn assert_scanned(&self) -> SvgsResult<()> {
        if self.scanned {
            Ok(())
        } else {
            Err(ScanError::NotScanned.into())
        }
    }

    fn collect_recursive(&mut self) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.errors.push(format!("Failed to read assets entry: {}", e));
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            if let Some(candidate) = self.analyze(entry.path()) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    fn collect_families(&mut self) -> SvgsResult<Vec<Candidate>> {
        let mut candidates = Vec::new();

        for family_dir in sorted_entries(&self.root)? {
            if !family_dir.is_dir() {
                self.errors.push(format!(
                    "Family directory expected, but found file: {}",
                    display_relative(&family_dir, &self.root)
                ));
                continue;
            }

            for icon_path in sorted_entries(&family_dir)? {
                if icon_path.is_dir() {
                    self.warnings.push(format!(
                        "Directory provided instead of .svg file: {}",
                        display_relative(&icon_path, &self.root)
                    ));
                    continue;
                }

                if let Some(candidate) = self.analyze(&icon_path) {
                    candidates.push(candidate);
                }
            }
        }

        Ok(candidates)
    }

    fn analyze(&mut self, path: &Path) -> Option<Candidate> {
        let shown = display_relative(path, &self.root);

        if path.extension().and_then(|e| e.to_str()) != Some("svg") {
            self.warnings.push(format!("Non-SVG file found in assets: {}", shown));
            return None;
        }

        let icon_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Err(e) = naming::validate_kebab_case(&icon_name) {
            self.errors.push(format!("{} ({})", e, shown));
            return None;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
        let family = family_of(&relative);

        Some(Candidate {
            absolute: path.to_path_buf(),
            relative,
            icon_name,
            family,
        })
    }
}

/// Hex-encoded SHA-256 of a file's bytes.
pub fn hash_file(path: &Path) -> SvgsResult<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(hash_bytes(&bytes))
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Parent folder of an assets-relative path, `/`-separated.
pub fn family_of(relative: &Path) -> Option<String> {
    let parent = relative.parent()?;
    let parts: Vec<_> = parent
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn sorted_entries(dir: &Path) -> SvgsResult<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list directory {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0"/></svg>"#;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_recursive_scan_orders_and_hashes() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write(temp_dir.path(), "media/play.svg", SVG);
        write(temp_dir.path(), "arrow.svg", "<svg/>");

        let mut scanner = AssetScanner::new(temp_dir.path());
        let records = scanner.scan()?.to_vec();

        assert_eq!(
            records
                .iter()
                .map(|r| (r.icon_name.as_str(), r.family.as_deref()))
                .collect::<Vec<_>>(),
            vec![("arrow", None), ("play", Some("media"))]
        );
        assert_eq!(records[0].hash, hash_bytes(b"<svg/>"));
        assert_eq!(records[1].path, PathBuf::from("media/play.svg"));
        assert_eq!(scanner.summary()?.assets, 2);
        Ok(())
    }

    #[test]
    fn test_non_svg_is_a_warning() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write(temp_dir.path(), "readme.md", "# icons");
        write(temp_dir.path(), "home.svg", SVG);

        let mut scanner = AssetScanner::new(temp_dir.path());
        scanner.scan()?;

        assert_eq!(scanner.records()?.len(), 1);
        assert_eq!(scanner.warnings().len(), 1);
        assert!(scanner.warnings()[0].contains("readme.md"));
        assert_eq!(scanner.summary()?.warnings, 1);
        Ok(())
    }

    #[test]
    fn test_invalid_name_fails_summary() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write(temp_dir.path(), "My_Icon.svg", SVG);
        write(temp_dir.path(), "home.svg", "<svg/>");

        let mut scanner = AssetScanner::new(temp_dir.path());
        scanner.scan()?;

        assert_eq!(scanner.records()?.len(), 1);
        assert!(scanner.errors()[0].starts_with("Invalid filename: \"My_Icon\""));
        let error = scanner.summary().unwrap_err();
        assert!(error.to_string().contains("My_Icon.svg"));
        assert!(error.to_string().contains("kebab-case"));
        Ok(())
    }

    #[test]
    fn test_summary_requires_scan() {
        let scanner = AssetScanner::new("does-not-matter");
        assert!(matches!(
            scanner.summary(),
            Err(crate::error::SvgsError::Scan(ScanError::NotScanned))
        ));
    }

    #[test]
    fn test_family_mode() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        write(temp_dir.path(), "app/close.svg", SVG);
        write(temp_dir.path(), "app/nested/deep.svg", "<svg/>");
        write(temp_dir.path(), "stray.svg", "<svg></svg>");

        let mut scanner = AssetScanner::new(temp_dir.path()).with_mode(ScanMode::Family);
        scanner.scan()?;

        let records = scanner.records()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].family.as_deref(), Some("app"));
        assert_eq!(scanner.warnings().len(), 1);
        assert!(scanner.warnings()[0].contains("nested"));
        assert_eq!(scanner.errors().len(), 1);
        assert!(scanner.errors()[0].contains("stray.svg"));
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let mut scanner = AssetScanner::new("/definitely/not/here");
        assert!(scanner.scan().is_err());
    }
}
