//! Build every document into the public directory

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::generator::{BuildReport, Generator};
use crate::Site;

/// Build the site
pub fn run(site: &Site) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let report = Generator::new(site)?.generate()?;

    tracing::info!(
        "Generated {} pages and copied {} assets in {:.2}s",
        report.pages.len(),
        report.assets,
        start.elapsed().as_secs_f64()
    );

    Ok(report)
}

/// Reload the site at `base_dir` and build it, logging any failure
///
/// Used by watch mode, where a broken document or config must not stop
/// the watcher.
pub fn rebuild(base_dir: &Path) -> Option<BuildReport> {
    match Site::new(base_dir).and_then(|site| run(&site)) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::error!("Build failed: {:#}", e);
            None
        }
    }
}

/// Whether a changed path should trigger a rebuild (hidden files and
/// editor backups do not)
fn is_relevant(path: &Path) -> bool {
    let path = path.to_string_lossy();
    !path.contains("/.") && !path.ends_with('~')
}

/// Watch sources, layouts and config, rebuilding on change
///
/// Failed rebuilds are logged and watching continues.
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(300), tx)?;

    let config_path = site.base_dir.join("_config.yml");
    for path in [&site.source_dir, &site.layouts_dir] {
        if path.exists() {
            debouncer.watcher().watch(path, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    for result in rx {
        match result {
            Ok(events) => {
                if !events.iter().any(|e| is_relevant(&e.path)) {
                    continue;
                }

                tracing::info!("Change detected, rebuilding...");
                // Config may have changed, so reload the site each time
                rebuild(&site.base_dir);
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}
