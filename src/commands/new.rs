//! Create a new document

use anyhow::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::content::{is_layout_name, Document};
use crate::Site;

/// Create a new document under the source dir, returning its path
///
/// `path` is relative to the source dir, without extension; it defaults to
/// the slugified title. It may not leave the source dir.
pub fn create_document(
    site: &Site,
    title: &str,
    layout: &str,
    path: Option<&str>,
) -> Result<PathBuf> {
    if !is_layout_name(layout) {
        anyhow::bail!("Invalid layout name: {}", layout);
    }

    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if !Path::new(&name)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        anyhow::bail!("Path must stay inside the source directory: {}", name);
    }
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = site.source_dir.join(format!("{}.md", name));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Local::now();
    let doc = Document::new(layout, title, "\n")?
        .with_field("date", now.format("%Y-%m-%d %H:%M:%S").to_string());

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, doc.to_source()?)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command, falling back to the configured default layout
pub fn run(
    site: &Site,
    title: &str,
    layout: Option<&str>,
    path: Option<&str>,
) -> Result<PathBuf> {
    let layout = layout.unwrap_or(&site.config.default_layout);
    tracing::debug!("New document uses layout '{}'", layout);
    create_document(site, title, layout, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::loader;

    #[test]
    fn test_new_document_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = run(&site, "Refactoring with an AI Agent", None, None).unwrap();
        assert_eq!(
            path,
            site.source_dir.join("refactoring-with-an-ai-agent.md")
        );

        let doc = loader::read_document(&path).unwrap();
        assert_eq!(doc.layout(), "post");
        assert_eq!(doc.title(), "Refactoring with an AI Agent");
        assert!(doc.extra().contains_key("date"));
    }

    #[test]
    fn test_new_document_custom_path_and_layout() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        let path = create_document(&site, "About", "page", Some("about/index")).unwrap();
        assert_eq!(path, site.source_dir.join("about/index.md"));
        assert_eq!(loader::read_document(&path).unwrap().layout(), "page");
    }

    #[test]
    fn test_new_document_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        run(&site, "Twice", None, None).unwrap();
        assert!(run(&site, "Twice", None, None).is_err());
    }

    #[test]
    fn test_new_document_rejects_bad_layout() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(create_document(&site, "x", "not valid", None).is_err());
    }

    #[test]
    fn test_new_document_stays_in_source_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();

        assert!(create_document(&site, "x", "page", Some("../escape")).is_err());
        assert!(create_document(&site, "x", "page", Some("a/../../escape")).is_err());
        assert!(create_document(&site, "x", "page", Some("/tmp/escape")).is_err());
        assert!(!dir.path().join("escape.md").exists());
    }
}
