//! Document model

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use super::frontmatter::{is_layout_name, FrontMatter};
use crate::error::ParseError;

/// A page source: front-matter plus Markdown body
///
/// Built once from source text and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    layout: String,
    title: String,
    body: String,
    extra: IndexMap<String, Value>,
}

impl Document {
    /// Build a document from its parts
    pub fn new(
        layout: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let layout = layout.into();
        if !is_layout_name(&layout) {
            return Err(ParseError::InvalidField {
                field: "layout",
                reason: format!("'{}' is not a layout name", layout),
            });
        }

        Ok(Self {
            layout,
            title: title.into(),
            body: body.into(),
            extra: IndexMap::new(),
        })
    }

    /// Parse a document from its source text
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let (fm, body) = FrontMatter::parse(source)?;
        Ok(Self {
            layout: fm.layout,
            title: fm.title,
            body: body.to_string(),
            extra: fm.extra,
        })
    }

    /// Attach an additional front-matter field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "layout" && key != "title" {
            self.extra.insert(key, value.into());
        }
        self
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw Markdown body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Front-matter keys other than `layout` and `title`, in source order
    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.extra
    }

    /// Serialize back to source text with YAML front-matter
    pub fn to_source(&self) -> Result<String, serde_yaml::Error> {
        let fm = FrontMatter {
            layout: self.layout.clone(),
            title: self.title.clone(),
            extra: self.extra.clone(),
        };
        Ok(format!("{}{}", fm.to_yaml()?, self.body))
    }
}

impl std::str::FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}
