use std::fs;
use std::path::{Path, PathBuf};

use super::{CleanStrategy, ConfigData, LayoutKind, TransformConfig};
use crate::error::{ConfigError, ErrorContext, SvgsResult};
use crate::layout::{Family, Layout, Standalone};
use crate::pool::DEFAULT_CONCURRENCY;
use crate::storage::atomic::normalize;
use crate::storage::database::DEFAULT_DATABASE_FILENAME;
use crate::transform::{CommandTransform, TemplateTransform, Target, Transform, TransformOptions};

pub const DEFAULT_CONFIG_FILENAME: &str = "svgs.toml";

const DEFAULT_CONFIG: &str = r#"# svgs configuration

# "standalone": assets/<icon>.svg          -> src/components/<Icon>.tsx
# "family":     assets/<family>/<icon>.svg -> src/<family>/components/<Icon>.tsx
layout = "standalone"

assets_dir = "assets"
src_dir = "src"

# Appended to every component name
suffix = ""

# Generate index.ts barrel files
index = false

# ["web"] or ["web", "native"]; several targets get their own subtree
targets = ["web"]

# "manifest" removes only files from the previous run, "wipe" removes every
# generated component and barrel
clean = "manifest"

concurrency = 10

# [transform]
# command = "node"
# args = ["scripts/svgr.mjs"]
#
# [transform.options]
# defaultSize = 24
"#;

#[derive(Debug, Clone)]
pub struct Config {
    pub data: ConfigData,
    /// Config file that was read, if any
    pub path: Option<PathBuf>,
    pub base_dir: PathBuf,
}

impl Config {
    /// Load `explicit`, or `svgs.toml` in `cwd` when present.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(cwd: impl AsRef<Path>, explicit: Option<&Path>) -> SvgsResult<Self> {
        let cwd = cwd.as_ref();

        let path = match explicit {
            Some(explicit) => {
                let resolved = cwd.join(explicit);
                if !resolved.is_file() {
                    return Err(ConfigError::NotFound { path: resolved }.into());
                }
                resolved
            }
            None => {
                let default_path = cwd.join(DEFAULT_CONFIG_FILENAME);
                if !default_path.is_file() {
                    return Ok(Self {
                        data: ConfigData::default(),
                        path: None,
                        base_dir: cwd.to_path_buf(),
                    });
                }
                default_path
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let data: ConfigData = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let config_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
        let base_dir = match &data.base_dir {
            Some(base) => normalize(&config_dir.join(base)),
            None => config_dir,
        };

        Ok(Self {
            data,
            path: Some(path),
            base_dir,
        })
    }

    /// Write a commented default config into `dir`. Never overwrites.
    pub fn init(dir: impl AsRef<Path>) -> SvgsResult<PathBuf> {
        let path = dir.as_ref().join(DEFAULT_CONFIG_FILENAME);
        if path.exists() {
            return Err(ConfigError::AlreadyExists { path }.into());
        }

        fs::write(&path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Resolve paths and defaults into the settings the pipeline runs with.
    pub fn settings(&self) -> SvgsResult<Settings> {
        let data = &self.data;
        let resolve = |value: &Option<PathBuf>, default: &str| {
            let relative = value.clone().unwrap_or_else(|| PathBuf::from(default));
            normalize(&self.base_dir.join(relative))
        };

        let mut targets = data.targets.clone().unwrap_or_else(|| vec![Target::Web]);
        targets.sort();
        targets.dedup();
        if targets.is_empty() {
            return Err(invalid("targets", "[]"));
        }

        let extension = data.extension.clone().unwrap_or_else(|| "tsx".to_string());
        let extension = extension.trim_start_matches('.').to_string();
        if extension.is_empty() {
            return Err(invalid("extension", "\"\""));
        }

        let concurrency = data.concurrency.unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(invalid("concurrency", "0"));
        }

        Ok(Settings {
            layout: data.layout,
            assets_dir: resolve(&data.assets_dir, "assets"),
            src_dir: resolve(&data.src_dir, "src"),
            database: resolve(&data.database, DEFAULT_DATABASE_FILENAME),
            base_dir: self.base_dir.clone(),
            suffix: data.suffix.clone(),
            index: data.index,
            extension,
            targets,
            clean: data.clean,
            concurrency,
            transform: data.transform.clone(),
        })
    }
}

fn invalid(field: &str, value: &str) -> crate::error::SvgsError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

/// Fully resolved run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub layout: LayoutKind,
    pub base_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub src_dir: PathBuf,
    pub database: PathBuf,
    pub suffix: String,
    pub index: bool,
    pub extension: String,
    pub targets: Vec<Target>,
    pub clean: CleanStrategy,
    pub concurrency: usize,
    pub transform: TransformConfig,
}

impl Settings {
    /// Defaults rooted at `base_dir`: `assets/` in, `src/` out.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        Self {
            layout: LayoutKind::default(),
            assets_dir: base_dir.join("assets"),
            src_dir: base_dir.join("src"),
            database: base_dir.join(DEFAULT_DATABASE_FILENAME),
            base_dir,
            suffix: String::new(),
            index: false,
            extension: "tsx".to_string(),
            targets: vec![Target::Web],
            clean: CleanStrategy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            transform: TransformConfig::default(),
        }
    }

    pub fn is_multi_target(&self) -> bool {
        self.targets.len() > 1
    }

    /// Output root for one target: `src/<target>` when several targets are
    /// generated, `src` otherwise.
    pub fn target_root(&self, target: Target) -> PathBuf {
        if self.is_multi_target() {
            self.src_dir.join(target.as_str())
        } else {
            self.src_dir.clone()
        }
    }

    pub fn transform_options(&self, target: Target) -> TransformOptions {
        TransformOptions::new(target, self.transform.options.clone())
    }

    pub fn layout(&self) -> Box<dyn Layout> {
        match self.layout {
            LayoutKind::Standalone => Box::new(Standalone),
            LayoutKind::Family => Box::new(Family),
        }
    }

    pub fn build_transform(&self) -> Box<dyn Transform> {
        match &self.transform.command {
            Some(program) => Box::new(
                CommandTransform::new(program.clone(), self.transform.args.clone())
                    .current_dir(&self.base_dir),
            ),
            None => Box::new(TemplateTransform::new()),
        }
    }
}
