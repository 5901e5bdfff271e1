use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

use super::{Transform, TransformOptions};

static PROLOG_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<\?xml.*?\?>|<!DOCTYPE[^>]*>|<!--.*?-->")
        .expect("Failed to compile prolog pattern")
});

static ROOT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<svg\b([^>]*)>").expect("Failed to compile root pattern"));

static SIZE_ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s(?:width|height|color)\s*=\s*("[^"]*"|'[^']*')"#)
        .expect("Failed to compile size attribute pattern")
});

static XMLNS_ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sxmlns(?::\w+)?\s*=\s*("[^"]*"|'[^']*')"#)
        .expect("Failed to compile xmlns pattern")
});

static HYPHEN_ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\s)([a-z]+(?:[-:][a-z]+)+)(\s*=)").expect("Failed to compile attribute pattern")
});

static CLASS_ATTR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\s)class(\s*=)").expect("Failed to compile class pattern"));

static ELEMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z]+)\b").expect("Failed to compile element pattern"));

/// SVG elements and their `react-native-svg` counterparts
const NATIVE_ELEMENTS: &[(&str, &str)] = &[
    ("circle", "Circle"),
    ("clipPath", "ClipPath"),
    ("defs", "Defs"),
    ("ellipse", "Ellipse"),
    ("g", "G"),
    ("line", "Line"),
    ("linearGradient", "LinearGradient"),
    ("mask", "Mask"),
    ("path", "Path"),
    ("polygon", "Polygon"),
    ("polyline", "Polyline"),
    ("radialGradient", "RadialGradient"),
    ("rect", "Rect"),
    ("stop", "Stop"),
    ("svg", "Svg"),
    ("text", "Text"),
    ("use", "Use"),
];

/// Built-in transform wrapping SVG markup in a typed function component.
///
/// Options: `defaultSize` (default `24`) and `defaultColor`
/// (default `currentColor`).
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateTransform;

impl TemplateTransform {
    pub fn new() -> Self {
        Self
    }

    fn markup(&self, source: &str, native: bool) -> Result<String> {
        let stripped = PROLOG_PATTERN.replace_all(source, "");
        let trimmed = stripped.trim();

        let Some(root) = ROOT_PATTERN.captures(trimmed) else {
            bail!("No <svg> root element found");
        };
        let whole = root.get(0).map_or(0..0, |m| m.range());

        let mut attrs = root[1].to_string();
        let self_closing = attrs.trim_end().ends_with('/');
        if self_closing {
            attrs = attrs.trim_end().trim_end_matches('/').to_string();
        }

        attrs = SIZE_ATTR_PATTERN.replace_all(&attrs, "").into_owned();
        if native {
            attrs = XMLNS_ATTR_PATTERN.replace_all(&attrs, "").into_owned();
        }

        let close = if self_closing { " />" } else { ">" };
        let opening = format!(
            "<svg{} width={{size}} height={{size}} color={{color}}{}",
            attrs.trim_end(),
            close
        );

        let markup = format!("{}{}{}", &trimmed[..whole.start], opening, &trimmed[whole.end..]);
        let markup = CLASS_ATTR_PATTERN.replace_all(&markup, "${1}className${2}");
        let markup = HYPHEN_ATTR_PATTERN.replace_all(&markup, |caps: &Captures| {
            let name = &caps[2];
            if name.starts_with("data-") || name.starts_with("aria-") {
                caps[0].to_string()
            } else {
                format!("{}{}{}", &caps[1], camel_case(name), &caps[3])
            }
        });

        Ok(markup.into_owned())
    }
}

impl Transform for TemplateTransform {
    fn transform(
        &self,
        source: &str,
        options: &TransformOptions,
        component_name: &str,
    ) -> Result<String> {
        let native = options.is_native();
        let mut markup = self.markup(source, native)?;

        let size = options
            .options
            .get("defaultSize")
            .map(|v| v.to_string().trim_matches('"').to_string())
            .unwrap_or_else(|| "24".to_string());
        let color = options.get_str("defaultColor").unwrap_or("currentColor");

        let mut header = String::new();
        if native {
            let (renamed, used) = to_native_elements(&markup);
            markup = renamed;
            let default = if used.contains("Svg") { "Svg" } else { "" };
            let named: Vec<_> = used.iter().filter(|name| *name != "Svg").cloned().collect();
            header.push_str(&native_import(default, &named));
        }

        let body = markup
            .lines()
            .map(|line| format!("    {}", line.trim_end()))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(format!(
            "{header}type {component_name}Props = {{\n  size?: number | string;\n  color?: string;\n}};\n\n\
             export function {component_name}({{ size = {size}, color = \"{color}\" }}: Readonly<{component_name}Props>) {{\n  return (\n{body}\n  );\n}}\n"
        ))
    }
}

fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '-' || ch == ':' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn to_native_elements(markup: &str) -> (String, BTreeSet<String>) {
    let mut used = BTreeSet::new();
    let renamed = ELEMENT_PATTERN.replace_all(markup, |caps: &Captures| {
        match NATIVE_ELEMENTS.iter().find(|(svg, _)| *svg == &caps[2]) {
            Some((_, native)) => {
                used.insert(native.to_string());
                format!("<{}{}", &caps[1], native)
            }
            None => caps[0].to_string(),
        }
    });
    (renamed.into_owned(), used)
}

fn native_import(default: &str, named: &[String]) -> String {
    match (default.is_empty(), named.is_empty()) {
        (true, true) => String::new(),
        (false, true) => format!("import {} from \"react-native-svg\";\n\n", default),
        (true, false) => format!("import {{ {} }} from \"react-native-svg\";\n\n", named.join(", ")),
        (false, false) => format!(
            "import {}, {{ {} }} from \"react-native-svg\";\n\n",
            default,
            named.join(", ")
        ),
    }
}
