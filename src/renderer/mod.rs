//! Page renderer: Document in, HTML page out
//!
//! Rendering is a pure function of the document, the site configuration and
//! the layout registry. Nothing here touches the filesystem or the clock, so
//! the same inputs always give the same bytes.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::{Document, MarkdownRenderer};
use crate::error::RenderError;
use crate::templates::LayoutRegistry;

/// Result of rendering one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPage {
    /// Layout actually used (after fallback)
    pub layout: String,
    pub title: String,
    /// Body HTML
    pub content: String,
    /// HTML of the text before `<!-- more -->`
    pub excerpt: Option<String>,
    /// The complete page
    pub html: String,
}

/// `page` variable seen by layouts
#[derive(Debug, Serialize)]
struct PageData<'a> {
    layout: &'a str,
    title: &'a str,
    content: &'a str,
    excerpt: Option<&'a str>,
    date: Option<&'a str>,
    tags: Vec<String>,
    extra: &'a IndexMap<String, Value>,
}

/// `config` variable seen by layouts
#[derive(Debug, Serialize)]
struct ConfigData<'a> {
    title: &'a str,
    subtitle: &'a str,
    description: &'a str,
    author: &'a str,
    language: &'a str,
    url: &'a str,
    root: &'a str,
    extra: &'a IndexMap<String, serde_yaml::Value>,
}

impl<'a> From<&'a SiteConfig> for ConfigData<'a> {
    fn from(config: &'a SiteConfig) -> Self {
        Self {
            title: &config.title,
            subtitle: &config.subtitle,
            description: &config.description,
            author: &config.author,
            language: &config.language,
            url: &config.url,
            root: &config.root,
            extra: &config.extra,
        }
    }
}

/// Renders documents into their named layouts
pub struct PageRenderer {
    config: SiteConfig,
    markdown: MarkdownRenderer,
    layouts: LayoutRegistry,
}

impl PageRenderer {
    pub fn new(config: SiteConfig, layouts: LayoutRegistry) -> Self {
        let markdown = MarkdownRenderer::with_config(&config.highlight);
        Self {
            config,
            markdown,
            layouts,
        }
    }

    /// Renderer using only the built-in layouts
    pub fn with_builtin_layouts(config: SiteConfig) -> Result<Self, RenderError> {
        Ok(Self::new(config, LayoutRegistry::builtin()?))
    }

    /// Parse source text and render it
    pub fn render_source(&self, source: &str) -> Result<RenderedPage, RenderError> {
        let doc = Document::parse(source)?;
        self.render(&doc)
    }

    /// Render a document into its layout
    pub fn render(&self, doc: &Document) -> Result<RenderedPage, RenderError> {
        let layout = self
            .layouts
            .resolve(doc.layout(), self.config.strict_layouts)?;

        let (excerpt_md, body_md) = MarkdownRenderer::split_excerpt(doc.body());
        let content = self.markdown.render(&body_md);
        let excerpt = excerpt_md.map(|md| self.markdown.render(md));

        let page = PageData {
            layout,
            title: doc.title(),
            content: &content,
            excerpt: excerpt.as_deref(),
            date: doc.extra().get("date").and_then(Value::as_str),
            tags: string_list(doc.extra().get("tags")),
            extra: doc.extra(),
        };

        let mut ctx = Context::new();
        ctx.insert("page", &page);
        ctx.insert("config", &ConfigData::from(&self.config));
        ctx.insert(
            "generator",
            &format!("pagesmith {}", env!("CARGO_PKG_VERSION")),
        );

        let html = self.layouts.render(layout, &ctx)?;
        tracing::debug!(
            "Rendered '{}' with layout '{}' ({} bytes)",
            doc.title(),
            layout,
            html.len()
        );

        Ok(RenderedPage {
            layout: layout.to_string(),
            title: doc.title().to_string(),
            content,
            excerpt,
            html,
        })
    }
}

/// A single string or a list of scalars, as strings
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    const ARTICLE: &str = r#"---
layout: post
title: Letting an agent refactor a Lambda handler
date: 2025-03-02 09:15:00
tags: [aws, refactoring]
---

The handler did everything: parsing, querying, formatting.

<!-- more -->

After the refactor it delegates to a `SkillService`:

```python
class SkillService:
    def __init__(self, repository):
        self.repository = repository
```
"#;

    fn renderer() -> PageRenderer {
        PageRenderer::with_builtin_layouts(SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_render_article() {
        let page = renderer().render_source(ARTICLE).unwrap();
        assert_eq!(page.layout, "post");
        assert_eq!(page.title, "Letting an agent refactor a Lambda handler");
        assert!(page.html.starts_with("<!DOCTYPE html>"));
        assert!(page
            .html
            .contains(r#"<h1 class="post-title">Letting an agent refactor a Lambda handler</h1>"#));
        assert!(page.html.contains("March 2, 2025"));
        assert!(page.html.contains("<li>aws</li><li>refactoring</li>"));
        assert!(page.html.contains("highlight python"));
        assert!(!page.html.contains("<!-- more -->"));
        assert!(page.excerpt.unwrap().contains("The handler did everything"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = renderer();
        let a = renderer.render_source(ARTICLE).unwrap();
        let b = renderer.render_source(ARTICLE).unwrap();
        assert_eq!(a, b);

        let again = PageRenderer::with_builtin_layouts(SiteConfig::default())
            .unwrap()
            .render_source(ARTICLE)
            .unwrap();
        assert_eq!(a.html, again.html);
    }

    #[test]
    fn test_missing_layout_is_parse_error() {
        let err = renderer()
            .render_source("---\ntitle: No layout\n---\nBody")
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Parse(ParseError::MissingField { field: "layout" })
        ));
    }

    #[test]
    fn test_missing_title_is_parse_error() {
        let err = renderer()
            .render_source("---\nlayout: post\n---\nBody")
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Parse(ParseError::MissingField { field: "title" })
        ));
    }

    #[test]
    fn test_empty_body_renders_empty_content_region() {
        let page = renderer()
            .render_source("---\nlayout: page\ntitle: Empty\n---\n")
            .unwrap();
        assert_eq!(page.content, "");
        assert!(page.excerpt.is_none());
        assert!(page.html.contains("<main class=\"content\">\n\n</main>"));
    }

    #[test]
    fn test_title_is_escaped() {
        let doc = Document::new("page", "Tom & <Jerry>", "text").unwrap();
        let page = renderer().render(&doc).unwrap();
        assert!(page.html.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(!page.html.contains("<Jerry>"));
    }

    #[test]
    fn test_unknown_layout_falls_back() {
        let doc = Document::new("gallery", "Pics", "").unwrap();
        let page = renderer().render(&doc).unwrap();
        assert_eq!(page.layout, "page");
        assert!(page.html.contains(r#"<h1 class="page-title">Pics</h1>"#));
    }

    #[test]
    fn test_unknown_layout_strict() {
        let config = SiteConfig {
            strict_layouts: true,
            ..Default::default()
        };
        let doc = Document::new("gallery", "Pics", "").unwrap();
        let err = PageRenderer::with_builtin_layouts(config)
            .unwrap()
            .render(&doc)
            .unwrap_err();
        assert!(matches!(err, RenderError::UnknownLayout(name) if name == "gallery"));
    }

    #[test]
    fn test_extra_fields_reach_layouts() {
        let layouts = LayoutRegistry::from_sources(vec![(
            "card".to_string(),
            "{{ page.extra.subtitle }}|{{ config.title }}|{{ page.tags | join(sep=\",\") }}"
                .to_string(),
        )])
        .unwrap();
        let renderer = PageRenderer::new(SiteConfig::default(), layouts);
        let page = renderer
            .render_source("---\nlayout: card\ntitle: t\nsubtitle: Sub\ntags: solo\n---\n")
            .unwrap();
        assert_eq!(page.html, "Sub|Pagesmith|solo");
    }

    #[test]
    fn test_site_config_extra_reaches_layouts() {
        let mut config = SiteConfig::default();
        config
            .extra
            .insert("github".to_string(), serde_yaml::Value::from("someone"));
        let layouts = LayoutRegistry::from_sources(vec![(
            "card".to_string(),
            "{{ config.extra.github }}".to_string(),
        )])
        .unwrap();
        let page = PageRenderer::new(config, layouts)
            .render_source("---\nlayout: card\ntitle: t\n---\n")
            .unwrap();
        assert_eq!(page.html, "someone");
    }

    #[test]
    fn test_more_marker_in_code_is_content() {
        let source = "---\nlayout: page\ntitle: Snippet\n---\nIntro\n\n```html\n<p>a</p>\n<!-- more -->\n<p>b</p>\n```\n";
        let page = renderer().render_source(source).unwrap();
        assert!(page.excerpt.is_none());
        assert!(page.content.contains("more"));
        assert!(page.content.contains("<span class=\"line-number\">3</span>"));
    }

    #[test]
    fn test_description_meta_escaped_once() {
        let doc = Document::new("page", "Cartoons", "Tom & Jerry").unwrap();
        let page = renderer().render(&doc).unwrap();
        assert!(page
            .html
            .contains(r#"<meta name="description" content="Tom &amp; Jerry">"#));
    }

    #[test]
    fn test_round_trip_through_render() {
        let doc = Document::parse(ARTICLE).unwrap();
        let reparsed = Document::parse(&doc.to_source().unwrap()).unwrap();
        let renderer = renderer();
        assert_eq!(
            renderer.render(&doc).unwrap(),
            renderer.render(&reparsed).unwrap()
        );
    }

    #[test]
    fn test_string_list() {
        assert_eq!(string_list(Some(&Value::from("a"))), vec!["a"]);
        assert_eq!(
            string_list(Some(&serde_json::json!(["a", 2, {"x": 1}]))),
            vec!["a", "2"]
        );
        assert!(string_list(None).is_empty());
    }
}
