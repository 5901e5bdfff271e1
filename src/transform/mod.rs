//! The SVG to component transform seam.
//!
//! The pipeline treats a transform as an opaque, possibly slow, possibly
//! failing function of `(svg source, options, component name)`.

pub mod command;
pub mod template;

pub use command::CommandTransform;
pub use template::TemplateTransform;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Output flavour of a generated component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Web,
    Native,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Web => "web",
            Target::Native => "native",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a transform gets besides the source text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformOptions {
    pub target: Target,
    /// User options from the `[transform.options]` config table
    pub options: Map<String, Value>,
}

impl TransformOptions {
    pub fn new(target: Target, options: Map<String, Value>) -> Self {
        Self { target, options }
    }

    pub fn is_native(&self) -> bool {
        self.target == Target::Native
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }
}

pub trait Transform: Send + Sync {
    fn transform(
        &self,
        source: &str,
        options: &TransformOptions,
        component_name: &str,
    ) -> anyhow::Result<String>;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn transform(
        &self,
        source: &str,
        options: &TransformOptions,
        component_name: &str,
    ) -> anyhow::Result<String> {
        (**self).transform(source, options, component_name)
    }
}
