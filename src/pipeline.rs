//! Incremental generation backed by the hash database.
//!
//! load → scan → detect → delete → convert → save → barrels. Only added and
//! updated icons are transformed; an unchanged tree produces no writes.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::barrel::Exports;
use crate::changes::{ChangeDetector, ChangeSet};
use crate::config::Settings;
use crate::convert::Converter;
use crate::emit::Emitter;
use crate::error::{DatabaseError, SvgsResult};
use crate::layout::Layout;
use crate::scanner::{AssetRecord, AssetScanner};
use crate::storage::{SaveOutcome, SvgDatabase};
use crate::transform::Transform;

/// Outcome of one `sync`
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub changes: ChangeSet,
    pub converted: usize,
    pub deleted: usize,
    pub barrels: usize,
    pub saved: SaveOutcome,
    pub duration: Duration,
}

pub struct Pipeline<'a> {
    settings: &'a Settings,
    layout: &'a dyn Layout,
    emitter: Emitter<'a>,
    database: SvgDatabase,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings, layout: &'a dyn Layout, transform: &'a dyn Transform) -> Self {
        Self {
            settings,
            layout,
            emitter: Emitter::new(settings, transform),
            database: SvgDatabase::new(&settings.database),
        }
    }

    /// Detect changes without writing anything.
    pub fn status(&self) -> SvgsResult<ChangeSet> {
        self.database.load()?;
        let assets = self.scan()?;
        self.detector().run(&assets)
    }

    pub fn sync(&self) -> SvgsResult<SyncReport> {
        let started = Instant::now();

        self.database.load()?;
        let assets = self.scan()?;
        let changes = self.detector().run(&assets)?;

        // Output of moved icons lives under the old family until removed here
        for previous in &changes.relocated {
            self.emitter.remove(previous.family.as_deref(), &previous.component_name)?;
            tracing::debug!(
                "Removed {} from its previous location {}",
                previous.component_name,
                previous.path.display()
            );
        }

        let converter = Converter::new(&self.emitter, &self.database)
            .with_concurrency(self.settings.concurrency);
        let deleted = converter.run_delete(changes.to_delete());
        let converted = converter.run_convert(&changes.to_convert());

        // Persist whatever succeeded before reporting failures
        let saved = self.database.save()?;
        let deleted = deleted?;
        let converted = converted?;
        if saved == SaveOutcome::InFlight {
            tracing::warn!("Another save of {} was in progress", self.database.path().display());
            return Err(DatabaseError::SaveInFlight {
                path: self.database.path().to_path_buf(),
            }
            .into());
        }

        let barrels = if self.settings.index && !changes.is_empty() {
            self.write_barrels(&changes.vacated_families())?
        } else {
            0
        };

        let report = SyncReport {
            changes,
            converted,
            deleted,
            barrels,
            saved,
            duration: started.elapsed(),
        };

        if report.changes.is_empty() {
            tracing::info!("✨ Icons are up to date");
        } else {
            tracing::info!(
                "✨ Synced {} converted, {} deleted in {:.2?}",
                report.converted,
                report.deleted,
                report.duration
            );
        }
        Ok(report)
    }

    /// Rebuild every barrel from the database contents and drop the barrels
    /// of `vacated` families that have no icons left.
    fn write_barrels(&self, vacated: &BTreeSet<&str>) -> SvgsResult<usize> {
        let mut exports = Exports::new();
        for icon in self.database.get_all()? {
            exports.insert(icon.family.as_deref(), icon.component_name);
        }
        let written = self.emitter.write_barrels(&exports)?.len();

        for &family in vacated {
            if exports.components(Some(family)).is_empty() {
                let removed = self.emitter.remove_barrels(family)?;
                tracing::info!("Removed {} barrel(s) of empty family '{}'", removed, family);
            }
        }
        Ok(written)
    }

    fn detector(&self) -> ChangeDetector<'_> {
        ChangeDetector::new(&self.database).with_suffix(self.settings.suffix.as_str())
    }

    /// Scan and validate the assets, then assign families per the layout.
    fn scan(&self) -> SvgsResult<Vec<AssetRecord>> {
        let mut scanner = AssetScanner::new(&self.settings.assets_dir)
            .with_mode(self.layout.scan_mode())
            .with_concurrency(self.settings.concurrency);
        scanner.scan()?;
        scanner.summary()?;

        scanner
            .records()?
            .iter()
            .map(|record| {
                Ok(AssetRecord {
                    family: self.layout.family_for(record)?,
                    ..record.clone()
                })
            })
            .collect()
    }
}
