//! Generator module - writes rendered pages and assets into the public directory

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::loader::{self, SourceFile};
use crate::renderer::{PageRenderer, RenderedPage};
use crate::templates::LayoutRegistry;
use crate::Site;

/// Summary of a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Output files written for documents, relative to the public dir
    pub pages: Vec<PathBuf>,
    /// Number of non-Markdown files copied
    pub assets: usize,
}

/// Static page generator for a site
pub struct Generator {
    site: Site,
    renderer: PageRenderer,
}

impl Generator {
    /// Create a new generator, loading the site's layouts
    pub fn new(site: &Site) -> Result<Self> {
        let layouts = LayoutRegistry::load(&site.layouts_dir)
            .with_context(|| format!("Failed to load layouts from {:?}", site.layouts_dir))?;
        tracing::debug!("Layouts available: {}", layouts.layout_names().join(", "));

        Ok(Self {
            site: site.clone(),
            renderer: PageRenderer::new(site.config.clone(), layouts),
        })
    }

    /// Render a single document file
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<RenderedPage> {
        let path = path.as_ref();
        let doc = loader::read_document(path)?;
        self.renderer
            .render(&doc)
            .with_context(|| format!("Failed to render {:?}", path))
    }

    /// Render every document under the source dir and copy assets
    ///
    /// Output paths are checked before anything is written: two sources
    /// that map to the same file are an error. Otherwise stops at the first
    /// document that fails to parse or render.
    pub fn generate(&self) -> Result<BuildReport> {
        let sources = loader::discover(&self.site.source_dir)?;
        let assets = loader::discover_assets(&self.site.source_dir)?;
        tracing::info!("Found {} documents", sources.len());

        let mut outputs = OutputClaims::default();
        for source in &sources {
            outputs.claim(source.output_path(), &source.relative)?;
        }
        for asset in &assets {
            outputs.claim(asset.clone(), asset)?;
        }

        fs::create_dir_all(&self.site.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.site.public_dir))?;

        let mut report = BuildReport::default();
        for source in &sources {
            report.pages.push(self.generate_page(source)?);
        }
        for asset in &assets {
            self.copy_asset(asset)?;
        }
        report.assets = assets.len();

        Ok(report)
    }

    fn generate_page(&self, source: &SourceFile) -> Result<PathBuf> {
        let page = self.render_file(&source.path)?;

        let relative = source.output_path();
        let output_path = self.site.public_dir.join(&relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, page.html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated page: {:?}", output_path);

        Ok(relative)
    }

    /// Copy a non-Markdown file (image etc.) next to its pages
    fn copy_asset(&self, relative: &Path) -> Result<()> {
        let src = self.site.source_dir.join(relative);
        let dest = self.site.public_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, &dest).with_context(|| format!("Failed to copy {:?}", src))?;
        tracing::debug!("Copied: {:?} -> {:?}", src, dest);
        Ok(())
    }
}

/// Output paths already taken, with the source that produces each
#[derive(Debug, Default)]
struct OutputClaims {
    owners: HashMap<PathBuf, PathBuf>,
}

impl OutputClaims {
    fn claim(&mut self, output: PathBuf, source: &Path) -> Result<()> {
        if let Some(owner) = self.owners.get(&output) {
            anyhow::bail!(
                "{:?} and {:?} would both be written to {:?}",
                owner,
                source,
                output
            );
        }
        self.owners.insert(output, source.to_path_buf());
        Ok(())
    }
}
