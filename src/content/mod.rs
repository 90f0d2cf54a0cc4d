//! Content module - handles posts, front-matter, headings and compilation

mod bundle;
mod compiler;
mod discovery;
mod frontmatter;
mod headings;
pub mod loader;
mod markdown;
mod post;

pub use bundle::{BundledModule, Loader};
pub use compiler::{CompileOptions, CompiledDocument, DocumentCompiler, MdxCompiler};
pub use discovery::{discover_posts, slug_for};
pub use frontmatter::FrontMatter;
pub use headings::{extract_headings, heading_id, Heading};
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::{sort_by_date, Post, PostMetadata};
