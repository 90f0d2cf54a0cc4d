//! Content loader - loads posts and the post catalog from disk

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::task::JoinSet;

use super::compiler::{CompileOptions, DocumentCompiler, MdxCompiler};
use super::discovery::{discover_posts, slug_for};
use super::headings::extract_headings;
use super::{FrontMatter, Post, PostMetadata};
use crate::config::SiteConfig;
use crate::error::ContentError;
use crate::highlight::Highlighter;

/// Loads posts from the content tree
///
/// Holds only read-only state, so one loader can serve concurrent requests.
/// Nothing is cached: every call goes back to disk.
#[derive(Clone)]
pub struct ContentLoader {
    base_dir: PathBuf,
    config: SiteConfig,
    highlighter: Arc<Highlighter>,
    compiler: Arc<dyn DocumentCompiler>,
}

impl ContentLoader {
    /// Create a new content loader using the MDX compiler
    pub fn new(base_dir: impl Into<PathBuf>, config: SiteConfig, highlighter: Arc<Highlighter>) -> Self {
        Self {
            base_dir: base_dir.into(),
            config,
            highlighter,
            compiler: Arc::new(MdxCompiler),
        }
    }

    /// Replace the document compiler
    pub fn with_compiler(mut self, compiler: Arc<dyn DocumentCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    /// Directory a slug resolves to
    ///
    /// Slugs are plain relative paths; anything that could leave the build
    /// directory is reported as not found.
    pub fn post_dir(&self, slug: &str) -> Result<PathBuf, ContentError> {
        let build_dir = self.base_dir.join(&self.config.build_dir);
        let is_plain = !slug.is_empty()
            && Path::new(slug)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if !is_plain {
            return Err(ContentError::NotFound {
                slug: slug.to_string(),
                path: build_dir,
            });
        }

        Ok(build_dir.join(slug))
    }

    /// Load and compile a single post
    pub async fn load_post(&self, slug: &str) -> Result<Post, ContentError> {
        let post_dir = self.post_dir(slug)?;
        let path = post_dir.join(&self.config.post_filename);

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ContentError::NotFound {
                    slug: slug.to_string(),
                    path,
                })
            }
            Err(source) => return Err(ContentError::Io { path, source }),
        };

        let headings = extract_headings(&raw);

        let compiler = Arc::clone(&self.compiler);
        let highlighter = Arc::clone(&self.highlighter);
        let loaders = self.config.loaders.clone();
        let cwd = post_dir;
        let body = tokio::task::spawn_blocking(move || {
            let options = CompileOptions {
                cwd: &cwd,
                highlighter: &highlighter,
                loaders: &loaders,
            };
            compiler.compile(&raw, &options)
        })
        .await?
        .map_err(|e| e.with_path(&path))?;

        tracing::debug!("Loaded post {} ({} headings)", slug, headings.len());

        Ok(Post {
            frontmatter: body.frontmatter.clone(),
            body,
            slug: slug.to_string(),
            headings,
        })
    }

    /// Read the front-matter of every post
    ///
    /// All files are read concurrently. The first failure fails the whole
    /// listing; no partial results are returned.
    pub async fn list_posts(&self) -> Result<Vec<PostMetadata>, ContentError> {
        let base_dir = self.base_dir.clone();
        let pattern = self.config.post_pattern();
        let paths =
            tokio::task::spawn_blocking(move || discover_posts(&base_dir, &pattern)).await??;

        let count = paths.len();
        let mut tasks = JoinSet::new();
        for (index, relative) in paths.into_iter().enumerate() {
            let slug = slug_for(&relative, &self.config.content_dir, &self.config.post_filename);
            let full = self.base_dir.join(&relative);
            tasks.spawn(async move {
                let raw = fs::read_to_string(&full)
                    .await
                    .map_err(|source| ContentError::Io {
                        path: full.clone(),
                        source,
                    })?;
                let (frontmatter, _) = FrontMatter::parse(&raw).map_err(|e| e.with_path(&full))?;
                Ok::<_, ContentError>((index, PostMetadata { frontmatter, slug }))
            });
        }

        // Dropping the set on an early return aborts the remaining reads
        let mut slots: Vec<Option<PostMetadata>> = vec![None; count];
        while let Some(joined) = tasks.join_next().await {
            let (index, metadata) = joined??;
            slots[index] = Some(metadata);
        }

        let posts: Vec<PostMetadata> = slots.into_iter().flatten().collect();
        tracing::info!("Loaded {} posts", posts.len());
        Ok(posts)
    }
}
