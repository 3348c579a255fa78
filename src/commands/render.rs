//! Render a single document

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::generator::Generator;
use crate::Site;

/// Render `input` with the site's layouts, to `output` or stdout
pub fn run(site: &Site, input: &Path, output: Option<&Path>) -> Result<()> {
    let page = Generator::new(site)?.render_file(input)?;

    match output {
        Some(output) => {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(output, &page.html)
                .with_context(|| format!("Failed to write {:?}", output))?;
            tracing::info!("Rendered {:?} -> {:?}", input, output);
        }
        None => print!("{}", page.html),
    }

    Ok(())
}
