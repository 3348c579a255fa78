//! Content loader - finds and reads documents in the source directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::Document;

/// A document source file found under the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path
    pub path: PathBuf,
    /// Path relative to the source directory
    pub relative: PathBuf,
}

impl SourceFile {
    /// Output path relative to the public directory
    pub fn output_path(&self) -> PathBuf {
        output_path_for(&self.relative)
    }
}

/// Read and parse one document
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let doc = Document::parse(&content).with_context(|| format!("Failed to parse {:?}", path))?;
    tracing::debug!("Loaded {:?} (layout '{}')", path, doc.layout());
    Ok(doc)
}

/// Find all Markdown documents under `source_dir`, sorted by path
///
/// Entries whose name starts with `_` or `.` are skipped along with
/// everything beneath them.
pub fn discover<P: AsRef<Path>>(source_dir: P) -> Result<Vec<SourceFile>> {
    let source_dir = source_dir.as_ref();
    if !source_dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()))
    {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", source_dir))?;
        let path = entry.path();

        if entry.file_type().is_file() && is_markdown_file(path) {
            let relative = path.strip_prefix(source_dir).unwrap_or(path).to_path_buf();
            files.push(SourceFile {
                path: path.to_path_buf(),
                relative,
            });
        }
    }

    Ok(files)
}

/// Find the non-Markdown files under `source_dir` (images etc.), relative
/// to it and sorted by path
///
/// Skips the same `_`/`.` entries as [`discover`].
pub fn discover_assets<P: AsRef<Path>>(source_dir: P) -> Result<Vec<PathBuf>> {
    let source_dir = source_dir.as_ref();
    if !source_dir.exists() {
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()))
    {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", source_dir))?;
        let path = entry.path();
        if entry.file_type().is_file() && !is_markdown_file(path) {
            assets.push(path.strip_prefix(source_dir)?.to_path_buf());
        }
    }

    Ok(assets)
}

/// Pretty output path: `about.md` -> `about/index.html`, `index.md` -> `index.html`
pub fn output_path_for(relative: &Path) -> PathBuf {
    let stem = relative.with_extension("");
    if stem.file_name().and_then(|n| n.to_str()) == Some("index") {
        stem.with_file_name("index.html")
    } else {
        stem.join("index.html")
    }
}

fn is_hidden(name: Option<&str>) -> bool {
    name.map(|n| n.starts_with('_') || n.starts_with('.'))
        .unwrap_or(false)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn test_output_paths() {
        assert_eq!(
            output_path_for(Path::new("index.md")),
            PathBuf::from("index.html")
        );
        assert_eq!(
            output_path_for(Path::new("about.md")),
            PathBuf::from("about/index.html")
        );
        assert_eq!(
            output_path_for(Path::new("blog/agent-refactor.markdown")),
            PathBuf::from("blog/agent-refactor/index.html")
        );
        assert_eq!(
            output_path_for(Path::new("docs/index.md")),
            PathBuf::from("docs/index.html")
        );
    }

    #[test]
    fn test_discover_skips_hidden_and_underscored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::create_dir_all(root.join("_drafts")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("index.md"), "").unwrap();
        fs::write(root.join("blog/post.markdown"), "").unwrap();
        fs::write(root.join("blog/image.png"), "").unwrap();
        fs::write(root.join("_drafts/wip.md"), "").unwrap();
        fs::write(root.join(".git/notes.md"), "").unwrap();
        fs::write(root.join("_partial.md"), "").unwrap();

        let found: Vec<_> = discover(root)
            .unwrap()
            .into_iter()
            .map(|f| f.relative)
            .collect();
        assert_eq!(
            found,
            vec![PathBuf::from("blog/post.markdown"), PathBuf::from("index.md")]
        );
    }

    #[test]
    fn test_discover_assets() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("blog")).unwrap();
        fs::create_dir_all(root.join("_drafts")).unwrap();
        fs::write(root.join("index.md"), "").unwrap();
        fs::write(root.join("blog/diagram.png"), "").unwrap();
        fs::write(root.join("_drafts/sketch.png"), "").unwrap();
        fs::write(root.join(".DS_Store"), "").unwrap();
        fs::write(root.join("favicon.ico"), "").unwrap();

        assert_eq!(
            discover_assets(root).unwrap(),
            vec![PathBuf::from("blog/diagram.png"), PathBuf::from("favicon.ico")]
        );
        assert!(discover_assets("/nonexistent/source").unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_dir() {
        assert!(discover("/nonexistent/source").unwrap().is_empty());
    }

    #[test]
    fn test_read_document_keeps_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        fs::write(&path, "---\nlayout: post\n---\nno title").unwrap();

        let err = read_document(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad.md"));
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::MissingField { field: "title" })
        );
    }
}
