//! Show a compiled post

use anyhow::Result;

use crate::Blog;

/// Print a post as JSON, or only its compiled HTML
pub async fn run(blog: &Blog, slug: &str, html_only: bool) -> Result<()> {
    let post = blog.load_post(slug).await?;

    if html_only {
        println!("{}", post.body.code);
    } else {
        println!("{}", serde_json::to_string_pretty(&post)?);
    }

    Ok(())
}
