//! List posts

use anyhow::Result;

use crate::content::{sort_by_date, PostMetadata};
use crate::Blog;

/// List every post, newest first
pub async fn run(blog: &Blog, json: bool) -> Result<()> {
    let mut posts = blog.list_posts().await?;
    sort_by_date(&mut posts);

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
    } else {
        print!("{}", format_posts(&posts));
    }

    Ok(())
}

/// One line per post: date, title and slug
pub fn format_posts(posts: &[PostMetadata]) -> String {
    let mut out = format!("Posts ({}):\n", posts.len());
    for post in posts {
        let date = post
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        out.push_str(&format!("  {} - {} [{}]\n", date, post.title(), post.slug));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;

    #[test]
    fn test_format_posts() {
        let (frontmatter, _) =
            FrontMatter::parse("---\ntitle: Hello\ndate: 2024-01-15\n---\n").unwrap();
        let posts = vec![
            PostMetadata {
                frontmatter,
                slug: "hello".to_string(),
            },
            PostMetadata {
                frontmatter: FrontMatter::default(),
                slug: "draft".to_string(),
            },
        ];

        let out = format_posts(&posts);
        assert_eq!(
            out,
            "Posts (2):\n  2024-01-15 - Hello [hello]\n  ---------- - draft [draft]\n"
        );
    }
}
