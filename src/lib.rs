pub mod barrel;
pub mod builder;
pub mod changes;
pub mod config;
pub mod convert;
pub mod emit;
pub mod error;
pub mod layout;
pub mod naming;
pub mod pipeline;
pub mod pool;
pub mod registry;
pub mod scanner;
pub mod storage;
pub mod transform;

pub use builder::{BuildSummary, Builder};
pub use changes::ChangeSet;
pub use config::{Config, Settings};
pub use error::{SvgsError, SvgsResult};
pub use pipeline::{Pipeline, SyncReport};

use std::path::Path;

use layout::Layout;
use transform::Transform;

/// A configured project: settings plus the layout and transform they select.
pub struct Svgs {
    settings: Settings,
    layout: Box<dyn Layout>,
    transform: Box<dyn Transform>,
}

impl Svgs {
    /// Load `svgs.toml` (or `config_path`) relative to `cwd`.
    pub fn new(cwd: impl AsRef<Path>, config_path: Option<&Path>) -> SvgsResult<Self> {
        let config = Config::load(cwd, config_path)?;
        Ok(Self::from_settings(config.settings()?))
    }

    pub fn from_settings(settings: Settings) -> Self {
        let layout = settings.layout();
        let transform = settings.build_transform();
        Self {
            settings,
            layout,
            transform,
        }
    }

    pub fn with_transform(mut self, transform: Box<dyn Transform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn generate(&self) -> SvgsResult<BuildSummary> {
        self.builder().generate()
    }

    pub fn clean(&self) -> SvgsResult<usize> {
        self.builder().clean()
    }

    pub fn sync(&self) -> SvgsResult<SyncReport> {
        self.pipeline().sync()
    }

    pub fn status(&self) -> SvgsResult<ChangeSet> {
        self.pipeline().status()
    }

    fn builder(&self) -> Builder<'_> {
        Builder::new(&self.settings, self.layout.as_ref(), self.transform.as_ref())
    }

    fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(&self.settings, self.layout.as_ref(), self.transform.as_ref())
    }
}
