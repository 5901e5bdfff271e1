pub mod project;

pub use project::{Config, Settings, DEFAULT_CONFIG_FILENAME};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::transform::Target;

/// Raw contents of `svgs.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigData {
    pub layout: LayoutKind,
    pub base_dir: Option<PathBuf>,
    pub assets_dir: Option<PathBuf>,
    pub src_dir: Option<PathBuf>,
    pub suffix: String,
    pub index: bool,
    pub extension: Option<String>,
    pub targets: Option<Vec<Target>>,
    pub clean: CleanStrategy,
    pub concurrency: Option<usize>,
    pub database: Option<PathBuf>,
    pub transform: TransformConfig,
}

/// How assets map onto output folders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// `assets/<icon>.svg` -> `src/components/<Icon>.tsx`
    #[default]
    Standalone,
    /// `assets/<family>/<icon>.svg` -> `src/<family>/components/<Icon>.tsx`
    Family,
}

/// What the clean phase removes before generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanStrategy {
    /// Exactly the files listed by the previous run's manifest
    #[default]
    Manifest,
    /// Every generated component and barrel under the output tree
    Wipe,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// External program; the built-in template transform is used when unset
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Passed through to the transform untouched
    pub options: Map<String, Value>,
}
