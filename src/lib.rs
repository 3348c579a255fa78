//! pagesmith: render Markdown pages with front-matter into named layouts
//!
//! A page source starts with a front-matter block naming its `layout` and
//! `title`, followed by a Markdown body. [`renderer::PageRenderer`] turns a
//! parsed [`content::Document`] into a full HTML page; [`Site`] wires the
//! renderer to a directory layout (`_config.yml`, `source/`, `layouts/`,
//! `public/`) for the command-line tool.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod renderer;
pub mod templates;

pub use content::Document;
pub use error::{ParseError, RenderError};
pub use renderer::{PageRenderer, RenderedPage};

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// User layouts directory
    pub layouts_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let layouts_dir = base_dir.join(&config.layouts_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            layouts_dir,
        }
    }

    /// Build every document into the public directory
    pub fn build(&self) -> Result<generator::BuildReport> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new document, returning its path
    ///
    /// `layout` defaults to `default_layout`; `path` is relative to the
    /// source dir and defaults to the slugified title.
    pub fn new_document(
        &self,
        title: &str,
        layout: Option<&str>,
        path: Option<&str>,
    ) -> Result<PathBuf> {
        commands::new::run(self, title, layout, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("source"));
        assert_eq!(site.public_dir, dir.path().join("public"));
        assert_eq!(site.layouts_dir, dir.path().join("layouts"));
    }

    #[test]
    fn test_site_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Notes\nsource_dir: content\npublic_dir: dist\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Notes");
        assert_eq!(site.source_dir, dir.path().join("content"));
        assert_eq!(site.public_dir, dir.path().join("dist"));
    }

    #[test]
    fn test_new_document_then_build() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = site
            .new_document("Hello Agent", Some("page"), Some("notes/hello"))
            .unwrap();
        assert_eq!(path, site.source_dir.join("notes/hello.md"));

        let report = site.build().unwrap();
        assert_eq!(report.pages, vec![PathBuf::from("notes/hello/index.html")]);
    }
}
