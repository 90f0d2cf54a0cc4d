//! CLI entry point for blog-content

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog-content")]
#[command(version)]
#[command(about = "Inspect the posts of an MDX blog", long_about = None)]
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
    /// List all posts with their front-matter
    #[command(alias = "ls")]
    List {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Compile a post and print it
    Show {
        /// Post slug
        slug: String,

        /// Print only the compiled HTML
        #[arg(long)]
        html: bool,
    },

    /// Print the heading outline of a post
    #[command(alias = "toc")]
    Headings {
        /// Post slug
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blog_content=debug,info"
    } else {
        "blog_content=info"
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
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let blog = blog_content::Blog::new(&base_dir)
        .with_context(|| format!("Failed to open blog at {:?}", base_dir))?;

    match cli.command {
        Commands::List { json } => {
            blog_content::commands::list::run(&blog, json).await?;
        }

        Commands::Show { slug, html } => {
            tracing::debug!("Compiling post {}", slug);
            blog_content::commands::show::run(&blog, &slug, html).await?;
        }

        Commands::Headings { slug } => {
            blog_content::commands::headings::run(&blog, &slug).await?;
        }
    }

    Ok(())
}
