//! Component output: transform once per target, then write atomically.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::barrel::{self, Exports};
use crate::config::Settings;
use crate::convert::ConvertHooks;
use crate::error::{ErrorContext, SvgsError, SvgsResult};
use crate::layout::component_dir;
use crate::storage::{atomic_write, ComponentMetadata};
use crate::transform::{Target, Transform};

pub struct Emitter<'a> {
    settings: &'a Settings,
    transform: &'a dyn Transform,
}

impl<'a> Emitter<'a> {
    pub fn new(settings: &'a Settings, transform: &'a dyn Transform) -> Self {
        Self {
            settings,
            transform,
        }
    }

    pub fn component_path(
        &self,
        target: Target,
        family: Option<&str>,
        component_name: &str,
    ) -> PathBuf {
        self.settings
            .target_root(target)
            .join(component_dir(family))
            .join(format!("{}.{}", component_name, self.settings.extension))
    }

    /// Transform `source` for every target without touching the disk.
    pub fn render(
        &self,
        source: &str,
        family: Option<&str>,
        component_name: &str,
    ) -> SvgsResult<Vec<(PathBuf, String)>> {
        self.settings
            .targets
            .iter()
            .map(|&target| {
                let options = self.settings.transform_options(target);
                let code = self
                    .transform
                    .transform(source, &options, component_name)
                    .map_err(|e| SvgsError::Transform {
                        component: component_name.to_string(),
                        message: format!("{:#}", e),
                    })?;
                Ok((self.component_path(target, family, component_name), code))
            })
            .collect()
    }

    /// Render and write one component. Nothing is written unless every
    /// target transformed successfully.
    pub fn emit(
        &self,
        source: &str,
        family: Option<&str>,
        component_name: &str,
    ) -> SvgsResult<Vec<PathBuf>> {
        let rendered = self.render(source, family, component_name)?;
        let mut written = Vec::with_capacity(rendered.len());
        for (path, code) in rendered {
            atomic_write(&path, &code)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Remove a component's files for every target. Returns how many existed.
    pub fn remove(&self, family: Option<&str>, component_name: &str) -> SvgsResult<usize> {
        let mut removed = 0;
        for &target in &self.settings.targets {
            let path = self.component_path(target, family, component_name);
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove {}", path.display()))
                }
            }
        }
        Ok(removed)
    }

    /// Write the barrels of every target root.
    pub fn write_barrels(&self, exports: &Exports) -> SvgsResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for &target in &self.settings.targets {
            written.extend(barrel::write(&self.settings.target_root(target), exports)?);
        }
        Ok(written)
    }

    /// Remove a family's barrel from every target root.
    pub fn remove_barrels(&self, family: &str) -> SvgsResult<usize> {
        let mut removed = 0;
        for &target in &self.settings.targets {
            if barrel::remove_family(&self.settings.target_root(target), family)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl ConvertHooks for Emitter<'_> {
    fn convert_one(&self, item: &ComponentMetadata) -> anyhow::Result<()> {
        let source_path = self.settings.assets_dir.join(&item.path);
        let source = fs::read_to_string(&source_path)
            .with_context(|| format!("Failed to read {}", source_path.display()))?;

        let written = self.emit(&source, item.family.as_deref(), &item.component_name)?;
        tracing::debug!("Converted {} -> {} file(s)", item.icon_name, written.len());
        Ok(())
    }

    fn delete_one(&self, item: &ComponentMetadata) -> anyhow::Result<()> {
        if self.remove(item.family.as_deref(), &item.component_name)? == 0 {
            tracing::warn!(
                "No generated files found for {}, nothing to delete",
                item.component_name
            );
        }
        Ok(())
    }
}
