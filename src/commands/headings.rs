//! Print a post's table of contents

use anyhow::Result;

use crate::content::Heading;
use crate::Blog;

pub async fn run(blog: &Blog, slug: &str) -> Result<()> {
    let post = blog.load_post(slug).await?;
    print!("{}", format_outline(&post.headings));
    Ok(())
}

/// Indented outline, two spaces per level below the first
pub fn format_outline(headings: &[Heading]) -> String {
    let mut out = String::new();
    for heading in headings {
        let indent = "  ".repeat(heading.level.saturating_sub(1) as usize);
        out.push_str(&format!("{}- {} (#{})\n", indent, heading.text, heading.id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::extract_headings;

    #[test]
    fn test_format_outline() {
        let headings = extract_headings("# Intro\n## Setup\n### Linux\n## Usage\n");
        assert_eq!(
            format_outline(&headings),
            "- Intro (#intro)\n  - Setup (#setup)\n    - Linux (#linux)\n  - Usage (#usage)\n"
        );
    }
}
