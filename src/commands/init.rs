//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Pagesmith
subtitle: ''
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: source
public_dir: public
layouts_dir: layouts

# Writing
default_layout: post
strict_layouts: false
highlight:
  enable: true
  line_number: true
  theme: base16-ocean.dark
"#;

const INDEX_TEMPLATE: &str = r#"---
layout: page
title: Welcome
---

This page was rendered by pagesmith. Edit `source/index.md` and run
`pagesmith build`.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("source"))?;
    fs::create_dir_all(target_dir.join("layouts"))?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG_TEMPLATE)?;
    write_if_missing(&target_dir.join("source/index.md"), INDEX_TEMPLATE)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::info!("Keeping existing {:?}", path);
    } else {
        fs::write(path, content)?;
        tracing::debug!("Created {:?}", path);
    }
    Ok(())
}
