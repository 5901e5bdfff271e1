//! Full (non-incremental) generation.
//!
//! `generate` runs clean, scan + convert, barrels, manifest save and the
//! scan summary in that order. Every per-file job has finished before the
//! barrels and the manifest are written.

use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::barrel::{Exports, BARREL_FILENAME};
use crate::config::{CleanStrategy, Settings};
use crate::emit::Emitter;
use crate::error::{ErrorContext, SvgsResult};
use crate::layout::Layout;
use crate::naming::to_pascal_case;
use crate::pool::worker_pool;
use crate::registry::DuplicateRegistry;
use crate::scanner::{AssetRecord, AssetScanner};
use crate::storage::manifest::MANIFEST_FILENAME;
use crate::storage::ManifestStore;
use crate::transform::Transform;

/// Hand-written files the wipe strategy never removes
const PRESERVED_FILES: &[&str] = &["types.ts"];

/// What a successful `generate` produced
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub exports: Exports,
    /// Previous output removed by the clean phase
    pub removed: usize,
    pub files_written: usize,
    pub barrels: usize,
    pub warnings: usize,
    pub duration: Duration,
}

impl BuildSummary {
    pub fn components(&self) -> usize {
        self.exports.len()
    }
}

pub struct Builder<'a> {
    settings: &'a Settings,
    layout: &'a dyn Layout,
    emitter: Emitter<'a>,
    manifest: ManifestStore,
}

impl<'a> Builder<'a> {
    pub fn new(settings: &'a Settings, layout: &'a dyn Layout, transform: &'a dyn Transform) -> Self {
        Self {
            settings,
            layout,
            emitter: Emitter::new(settings, transform),
            manifest: ManifestStore::new(&settings.src_dir),
        }
    }

    pub fn generate(&self) -> SvgsResult<BuildSummary> {
        let started = Instant::now();
        tracing::info!(
            "Generating {} icons from {}",
            self.layout.name(),
            self.settings.assets_dir.display()
        );

        let removed = self.clean()?;

        let mut scanner = AssetScanner::new(&self.settings.assets_dir)
            .with_mode(self.layout.scan_mode())
            .with_concurrency(self.settings.concurrency);

        // Output written before a failure is still tracked for the next clean
        let built = self.build(&mut scanner);
        let saved = self.manifest.save();
        let (exports, files_written, barrels) = match built {
            Ok(built) => built,
            Err(e) => {
                if let Err(save_error) = saved {
                    tracing::warn!("Failed to save manifest after error: {}", save_error);
                }
                return Err(e);
            }
        };
        saved?;

        let scan = scanner.summary()?;
        let summary = BuildSummary {
            exports,
            removed,
            files_written,
            barrels,
            warnings: scan.warnings,
            duration: started.elapsed(),
        };

        tracing::info!(
            "✨ Generated {} components ({} files) in {:.2?}",
            summary.components(),
            summary.files_written,
            summary.duration
        );
        Ok(summary)
    }

    /// Remove the previous output according to the configured strategy.
    pub fn clean(&self) -> SvgsResult<usize> {
        let removed = match self.settings.clean {
            CleanStrategy::Manifest => self.manifest.clean()?,
            CleanStrategy::Wipe => self.wipe()?,
        };

        if removed > 0 {
            tracing::info!("Removed {} previously generated file(s)", removed);
        }
        Ok(removed)
    }

    fn wipe(&self) -> SvgsResult<usize> {
        let src = &self.settings.src_dir;
        if !src.is_dir() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in WalkDir::new(src).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if PRESERVED_FILES.contains(&&*name) {
                continue;
            }

            let generated = name == BARREL_FILENAME
                || name == MANIFEST_FILENAME
                || entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == self.settings.extension.as_str());
            if generated {
                fs::remove_file(entry.path())
                    .with_context(|| format!("Failed to remove {}", entry.path().display()))?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn build(&self, scanner: &mut AssetScanner) -> SvgsResult<(Exports, usize, usize)> {
        scanner.scan()?;
        let (exports, files_written) = self.process(scanner.records()?)?;

        let barrels = if self.settings.index {
            let written = self.emitter.write_barrels(&exports)?;
            for path in &written {
                self.manifest.track(path);
            }
            written.len()
        } else {
            0
        };

        Ok((exports, files_written, barrels))
    }

    fn process(&self, records: &[AssetRecord]) -> SvgsResult<(Exports, usize)> {
        let registry = DuplicateRegistry::new();
        let exports = Mutex::new(Exports::new());

        let pool = worker_pool(self.settings.concurrency)?;
        let written: Vec<usize> = pool.install(|| {
            records
                .par_iter()
                .map(|record| self.process_one(record, &registry, &exports))
                .collect::<SvgsResult<Vec<usize>>>()
        })?;

        if registry.is_empty() {
            tracing::warn!("No icons found in {}", self.settings.assets_dir.display());
        } else {
            tracing::debug!("Registered {} unique component name(s)", registry.len());
        }
        let exports = exports.into_inner().unwrap_or_else(|e| e.into_inner());
        Ok((exports, written.iter().sum()))
    }

    fn process_one(
        &self,
        record: &AssetRecord,
        registry: &DuplicateRegistry,
        exports: &Mutex<Exports>,
    ) -> SvgsResult<usize> {
        let family = self.layout.family_for(record)?;
        let component_name = to_pascal_case(&record.icon_name, &self.settings.suffix);
        let source_path: PathBuf = self.settings.assets_dir.join(&record.path);

        registry.check_and_register_name(&component_name, &source_path)?;
        registry.check_and_register_content(&record.hash, &source_path)?;

        let source = fs::read_to_string(&source_path)
            .with_context(|| format!("Failed to read {}", source_path.display()))?;
        let written = self.emitter.emit(&source, family.as_deref(), &component_name)?;
        for path in &written {
            self.manifest.track(path);
        }

        tracing::debug!("{} -> {}", record.path.display(), component_name);
        exports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(family.as_deref(), component_name);
        Ok(written.len())
    }
}
