//! Barrel (`index.ts`) rendering.
//!
//! A family barrel re-exports its components, the root barrel re-exports
//! every family. Flat (standalone) components are exported straight from the
//! root barrel. All lists are sorted byte-wise so output is stable.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ErrorContext, SvgsResult};
use crate::layout::COMPONENTS_DIR;
use crate::storage::atomic_write;

pub const BARREL_FILENAME: &str = "index.ts";

/// Component names grouped by family
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exports {
    families: BTreeMap<String, BTreeSet<String>>,
    flat: BTreeSet<String>,
}

impl Exports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: Option<&str>, component_name: impl Into<String>) {
        match family {
            Some(family) => {
                self.families
                    .entry(family.to_string())
                    .or_default()
                    .insert(component_name.into());
            }
            None => {
                self.flat.insert(component_name.into());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.flat.len() + self.families.values().map(BTreeSet::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn families(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.families.iter().map(|(family, names)| (family.as_str(), names))
    }

    /// Every component under `family`, or the flat set for `None`
    pub fn components(&self, family: Option<&str>) -> Vec<&str> {
        let names = match family {
            Some(family) => self.families.get(family),
            None => Some(&self.flat),
        };
        names
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// One barrel file, its path relative to a target root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barrel {
    pub path: PathBuf,
    pub content: String,
}

/// Render every barrel for `exports`. The root barrel is always present.
pub fn render(exports: &Exports) -> Vec<Barrel> {
    let mut barrels = Vec::with_capacity(exports.families.len() + 1);
    let mut root_lines = Vec::new();

    for (family, names) in exports.families() {
        let lines: Vec<String> = names.iter().map(|name| component_export(name)).collect();
        barrels.push(Barrel {
            path: Path::new(family).join(BARREL_FILENAME),
            content: join_lines(&lines),
        });

        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        root_lines.push(format!(
            "export {{ {} }} from \"./{}\";",
            names.join(", "),
            family
        ));
    }

    root_lines.extend(exports.flat.iter().map(|name| component_export(name)));

    barrels.push(Barrel {
        path: PathBuf::from(BARREL_FILENAME),
        content: join_lines(&root_lines),
    });
    barrels
}

/// Write every barrel under `root`, returning the absolute paths written.
pub fn write(root: &Path, exports: &Exports) -> SvgsResult<Vec<PathBuf>> {
    let mut written = Vec::new();
    for barrel in render(exports) {
        let path = root.join(&barrel.path);
        atomic_write(&path, &barrel.content)?;
        written.push(path);
    }

    tracing::debug!("Wrote {} barrel file(s) under {}", written.len(), root.display());
    Ok(written)
}

/// Delete the barrel of a family that no longer exports anything.
/// Returns whether a file was removed.
pub fn remove_family(root: &Path, family: &str) -> SvgsResult<bool> {
    let path = root.join(family).join(BARREL_FILENAME);
    match fs::remove_file(&path) {
        Ok(()) => {
            tracing::debug!("Removed stale barrel {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

fn component_export(name: &str) -> String {
    format!("export {{ {name} }} from \"./{COMPONENTS_DIR}/{name}\";")
}

fn join_lines(lines: &[String]) -> String {
    let mut content = lines.join("\n");
    content.push('\n');
    content
}
