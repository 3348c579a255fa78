//! CLI entry point for pagesmith

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pagesmith")]
#[command(version)]
#[command(about = "Render Markdown pages with front-matter into HTML layouts", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Render one document to stdout or a file
    #[command(alias = "r")]
    Render {
        /// Document to render
        file: PathBuf,

        /// Write the page here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check documents' front-matter without rendering
    Check {
        /// Documents to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Build every document in the source directory
    #[command(alias = "g")]
    Build {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Create a new document
    New {
        /// Layout to use (defaults to `default_layout` from the config)
        #[arg(short, long)]
        layout: Option<String>,

        /// Title of the new document
        title: String,

        /// Path for the new document, relative to the source directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Delete the public folder
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "pagesmith=debug,info"
    } else {
        "pagesmith=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            pagesmith::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::Render { file, output } => {
            let site = pagesmith::Site::new(&base_dir)?;
            pagesmith::commands::render::run(&site, &file, output.as_deref())?;
        }

        Commands::Check { files } => {
            pagesmith::commands::check::run(&files)?;
        }

        Commands::Build { watch } => {
            let site = pagesmith::Site::new(&base_dir)?;
            tracing::info!("Building {:?}...", site.source_dir);

            if watch {
                // Startup failures are logged like any later rebuild
                if pagesmith::commands::build::rebuild(&site.base_dir).is_some() {
                    println!("Built successfully!");
                }
                pagesmith::commands::build::watch(&site)?;
            } else {
                site.build()?;
                println!("Built successfully!");
            }
        }

        Commands::New {
            layout,
            title,
            path,
        } => {
            let site = pagesmith::Site::new(&base_dir)?;
            tracing::info!("Creating new document with title: {}", title);
            let created = site.new_document(&title, layout.as_deref(), path.as_deref())?;
            println!("Created: {:?}", created);
        }

        Commands::Clean => {
            let site = pagesmith::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }
    }

    Ok(())
}
