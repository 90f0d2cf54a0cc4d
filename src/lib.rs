//! blog-content: the content layer of an MDX blog
//!
//! This crate reads post folders (front-matter plus an MDX body), extracts
//! the heading outline for a table of contents, and compiles bodies into
//! highlighted HTML fragments for the rendering layer.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod highlight;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use content::{Heading, Post, PostMetadata};
pub use error::ContentError;

/// The blog content tree
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    loader: content::ContentLoader,
}

impl Blog {
    /// Open a blog from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, ContentError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Open a blog with an explicit configuration
    ///
    /// Code themes are loaded here, once, and shared by every later compile.
    pub fn with_config<P: AsRef<Path>>(
        base_dir: P,
        config: config::SiteConfig,
    ) -> Result<Self, ContentError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let themes = highlight::CodeThemes::load(&base_dir, &config.code_theme)?;
        let highlighter = Arc::new(highlight::Highlighter::new(
            themes,
            config.highlight.clone(),
        ));
        let loader = content::ContentLoader::new(&base_dir, config.clone(), highlighter);

        Ok(Self {
            config,
            base_dir,
            loader,
        })
    }

    /// Load and compile one post by slug
    pub async fn load_post(&self, slug: &str) -> Result<Post, ContentError> {
        self.loader.load_post(slug).await
    }

    /// List the front-matter of every post
    pub async fn list_posts(&self) -> Result<Vec<PostMetadata>, ContentError> {
        self.loader.list_posts().await
    }
}
