//! Post body compilation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::bundle::{resolve_module, split_esm, BundledModule, Loader};
use super::markdown::MarkdownRenderer;
use super::FrontMatter;
use crate::error::ContentError;
use crate::highlight::Highlighter;

/// Everything a compiler needs besides the source text
pub struct CompileOptions<'a> {
    /// Post directory; relative imports resolve against it
    pub cwd: &'a Path,
    /// Code block post-processing step
    pub highlighter: &'a Highlighter,
    /// Module loaders by file extension
    pub loaders: &'a IndexMap<String, Loader>,
}

/// A compiled post body, ready for the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledDocument {
    /// Rendered HTML fragment
    pub code: String,
    pub frontmatter: FrontMatter,
    /// Local modules imported by the body
    pub modules: Vec<BundledModule>,
    /// Bare specifiers the host page must provide
    pub externals: Vec<String>,
    /// `export` statements, verbatim
    pub exports: Vec<String>,
}

/// Turns a raw entry document into a [`CompiledDocument`]
pub trait DocumentCompiler: Send + Sync {
    fn compile(
        &self,
        source: &str,
        options: &CompileOptions<'_>,
    ) -> Result<CompiledDocument, ContentError>;
}

/// MDX compiler: front-matter, top-level ESM, then markdown with highlighted code
#[derive(Debug, Clone, Copy, Default)]
pub struct MdxCompiler;

impl DocumentCompiler for MdxCompiler {
    fn compile(
        &self,
        source: &str,
        options: &CompileOptions<'_>,
    ) -> Result<CompiledDocument, ContentError> {
        let (frontmatter, body) = FrontMatter::parse(source)?;
        let esm = split_esm(body)?;

        let mut modules = Vec::new();
        let mut externals: Vec<String> = Vec::new();
        for import in &esm.imports {
            if import.is_relative() {
                modules.push(resolve_module(options.cwd, import, options.loaders)?);
            } else if !externals.contains(&import.specifier) {
                externals.push(import.specifier.clone());
            }
        }

        let code = MarkdownRenderer::new(options.highlighter).render(&esm.markdown)?;

        tracing::debug!(
            "Compiled {:?}: {} bytes, {} modules, {} externals",
            options.cwd,
            code.len(),
            modules.len(),
            externals.len()
        );

        Ok(CompiledDocument {
            code,
            frontmatter,
            modules,
            externals,
            exports: esm.exports,
        })
    }
}
