//! Post models

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{CompiledDocument, FrontMatter, Heading};

/// A fully loaded blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Compiled body
    pub body: CompiledDocument,

    /// Front-matter as written, no schema applied
    pub frontmatter: FrontMatter,

    /// Slug (post directory name)
    pub slug: String,

    /// Headings in source order
    pub headings: Vec<Heading>,
}

impl Post {
    /// Title from front-matter, falling back to the slug
    pub fn title(&self) -> &str {
        self.frontmatter.title().unwrap_or(self.slug.as_str())
    }
}

/// Front-matter and slug of a post, without its compiled body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub frontmatter: FrontMatter,
    pub slug: String,
}

impl PostMetadata {
    /// Title from front-matter, falling back to the slug
    pub fn title(&self) -> &str {
        self.frontmatter.title().unwrap_or(self.slug.as_str())
    }

    /// Publication date, if the front-matter carries a parseable one
    pub fn date(&self) -> Option<DateTime<Local>> {
        self.frontmatter.date()
    }
}

/// Sort by date descending (newest first); undated posts go last, by slug
pub fn sort_by_date(posts: &mut [PostMetadata]) {
    posts.sort_by(|a, b| match (a.date(), b.date()) {
        (Some(da), Some(db)) => db.cmp(&da).then_with(|| a.slug.cmp(&b.slug)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.slug.cmp(&b.slug),
    });
}
