//! Named page layouts rendered with the Tera template engine
//!
//! Three layouts are embedded in the binary (`default`, `page`, `post`).
//! A site may add or override layouts with `*.html` files in its layouts
//! directory; a file at `layouts/blog/wide.html` is the layout `blog/wide`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::error::RenderError;
use crate::helpers;

/// Layouts compiled into the binary
const BUILTIN_LAYOUTS: [(&str, &str); 3] = [
    ("default", include_str!("builtin/default.html")),
    ("page", include_str!("builtin/page.html")),
    ("post", include_str!("builtin/post.html")),
];

/// Tried in order when a document names a layout that does not exist
const FALLBACK_LAYOUTS: [&str; 2] = ["page", "default"];

/// Registry of named layouts
pub struct LayoutRegistry {
    tera: Tera,
    names: Vec<String>,
}

impl LayoutRegistry {
    /// Registry with only the built-in layouts
    pub fn builtin() -> Result<Self, RenderError> {
        Self::from_sources(Vec::new())
    }

    /// Built-in layouts plus every `*.html` file under `layouts_dir`
    ///
    /// A missing directory is not an error.
    pub fn load<P: AsRef<Path>>(layouts_dir: P) -> Result<Self, RenderError> {
        let dir = layouts_dir.as_ref();
        let mut user = Vec::new();

        if dir.is_dir() {
            for entry in WalkDir::new(dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                let is_html = path.extension().and_then(|e| e.to_str()) == Some("html");
                if !path.is_file() || !is_html {
                    continue;
                }

                let relative = path.strip_prefix(dir).unwrap_or(path);
                let name = relative
                    .with_extension("")
                    .to_string_lossy()
                    .replace('\\', "/");
                user.push((name, fs::read_to_string(path)?));
                tracing::debug!("Loaded layout {:?} from {:?}", relative, dir);
            }
        }

        Self::from_sources(user)
    }

    /// Built-in layouts plus the given (name, template source) pairs
    pub fn from_sources(user: Vec<(String, String)>) -> Result<Self, RenderError> {
        let mut sources: BTreeMap<String, String> = BUILTIN_LAYOUTS
            .iter()
            .map(|(name, source)| (name.to_string(), source.to_string()))
            .collect();

        for (name, source) in user {
            if sources.insert(name.clone(), source).is_some() {
                tracing::debug!("Layout '{}' overrides the built-in one", name);
            }
        }

        let mut tera = Tera::default();

        // Page content is already HTML; templates escape titles explicitly
        tera.autoescape_on(vec![]);

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("squash", squash_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);

        tera.add_raw_templates(
            sources
                .iter()
                .map(|(name, source)| (template_name(name), source.as_str())),
        )?;

        Ok(Self {
            tera,
            names: sources.into_keys().collect(),
        })
    }

    /// Check if a layout exists
    pub fn has_layout(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Available layout names, sorted
    pub fn layout_names(&self) -> &[String] {
        &self.names
    }

    /// Pick the layout to render `requested` with
    ///
    /// In strict mode an unknown layout is an error, otherwise the first
    /// available fallback is used.
    pub fn resolve<'a>(&'a self, requested: &'a str, strict: bool) -> Result<&'a str, RenderError> {
        if self.has_layout(requested) {
            return Ok(requested);
        }
        if strict {
            return Err(RenderError::UnknownLayout(requested.to_string()));
        }

        let fallback = FALLBACK_LAYOUTS
            .iter()
            .copied()
            .find(|name| self.has_layout(name))
            .ok_or_else(|| RenderError::UnknownLayout(requested.to_string()))?;
        tracing::warn!("Layout '{}' not found, using '{}'", requested, fallback);
        Ok(fallback)
    }

    /// Render a layout with given context
    pub fn render(&self, layout: &str, context: &Context) -> Result<String, RenderError> {
        if !self.has_layout(layout) {
            return Err(RenderError::UnknownLayout(layout.to_string()));
        }
        Ok(self.tera.render(&template_name(layout), context)?)
    }
}

fn template_name(layout: &str) -> String {
    format!("{}.html", layout)
}

/// Tera filter: HTML to plain text (tags removed, entities decoded)
///
/// The result is unescaped text, so layouts pipe it through `escape`.
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(helpers::html_unescape(
        &helpers::strip_html(&s),
    )))
}

/// Tera filter: collapse whitespace runs
fn squash_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("squash", "value", String, value);
    Ok(tera::Value::String(helpers::squash_whitespace(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "...".to_string(),
    };

    Ok(tera::Value::String(helpers::truncate(&s, length, &omission)))
}

/// Tera filter: format a date string, unparseable dates pass through
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    let formatted = match helpers::parse_date(&s) {
        Some(date) => helpers::format_date(&date, &format),
        None => s,
    };
    Ok(tera::Value::String(formatted))
}
