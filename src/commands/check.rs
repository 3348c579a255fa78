//! Validate documents without rendering them

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::content::loader;

/// Outcome of checking one file
#[derive(Debug)]
pub struct CheckResult {
    pub path: PathBuf,
    /// (layout, title) on success
    pub outcome: Result<(String, String)>,
}

impl CheckResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Parse each file's front-matter
pub fn check_files<P: AsRef<Path>>(paths: &[P]) -> Vec<CheckResult> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let outcome = loader::read_document(path)
                .map(|doc| (doc.layout().to_string(), doc.title().to_string()));
            CheckResult {
                path: path.to_path_buf(),
                outcome,
            }
        })
        .collect()
}

/// Run the check command, failing if any file is invalid
pub fn run<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    let results = check_files(paths);
    let failed = results.iter().filter(|r| !r.is_ok()).count();

    for result in &results {
        match &result.outcome {
            Ok((layout, title)) => {
                println!("ok    {} [{}] {}", result.path.display(), layout, title)
            }
            Err(e) => println!("error {}: {:#}", result.path.display(), e),
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} documents failed", failed, results.len());
    }
    Ok(())
}
