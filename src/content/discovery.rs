//! Post discovery on disk

use glob::Pattern;
use std::path::{Path, PathBuf};

use crate::error::ContentError;

/// Find every path under `base_dir` matching `post_pattern`
///
/// `post_pattern` is a glob relative to `base_dir` (see
/// [`SiteConfig::post_pattern`](crate::config::SiteConfig::post_pattern)).
/// Returned paths are relative to `base_dir`. A missing content directory
/// simply yields no posts. Every match is returned, so a directory that
/// happens to carry the entry filename fails later when it is read.
pub fn discover_posts(
    base_dir: &Path,
    post_pattern: &str,
) -> Result<Vec<PathBuf>, ContentError> {
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&base_dir.to_string_lossy()),
        post_pattern
    );

    let entries = glob::glob(&pattern).map_err(|e| ContentError::Discovery {
        pattern: pattern.clone(),
        message: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ContentError::Discovery {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!("Discovered post {:?}", path);
        let relative = path
            .strip_prefix(base_dir)
            .map(Path::to_path_buf)
            .unwrap_or(path);
        paths.push(relative);
    }

    Ok(paths)
}

/// Slug for a discovered entry document: the path without the content root
/// and without the entry filename
pub fn slug_for(relative: &Path, content_dir: &str, post_filename: &str) -> String {
    let without_root = relative
        .strip_prefix(content_dir.trim_end_matches('/'))
        .unwrap_or(relative);
    let post_dir = if without_root.file_name().and_then(|n| n.to_str()) == Some(post_filename) {
        without_root.parent().unwrap_or(without_root)
    } else {
        without_root
    };

    post_dir
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;

    fn write_post(base: &Path, rel: &str) {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "---\ntitle: x\n---\n").unwrap();
    }

    #[test]
    fn test_discover_two_level_layout() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "content/first-post/index.mdx");
        write_post(dir.path(), "content/second-post/index.mdx");
        write_post(dir.path(), "content/nested/deeper/index.mdx");
        write_post(dir.path(), "content/other/readme.mdx");
        write_post(dir.path(), "content/index.mdx");

        let mut paths = discover_posts(dir.path(), &SiteConfig::default().post_pattern()).unwrap();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("content/first-post/index.mdx"),
                PathBuf::from("content/second-post/index.mdx"),
            ]
        );
    }

    #[test]
    fn test_directory_named_like_entry_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "content/a/index.mdx");
        fs::create_dir_all(dir.path().join("content/b/index.mdx")).unwrap();

        let mut paths = discover_posts(dir.path(), "content/*/index.mdx").unwrap();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("content/a/index.mdx"),
                PathBuf::from("content/b/index.mdx"),
            ]
        );
    }

    #[test]
    fn test_missing_content_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = discover_posts(dir.path(), "content/*/index.mdx").unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn test_base_dir_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("site[1]");
        write_post(&base, "content/a/index.mdx");
        let paths = discover_posts(&base, "content/*/index.mdx").unwrap();
        assert_eq!(paths, vec![PathBuf::from("content/a/index.mdx")]);
    }

    #[test]
    fn test_content_dir_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "posts[2024]/a/index.mdx");
        write_post(dir.path(), "posts2/b/index.mdx");
        let config = SiteConfig {
            content_dir: "posts[2024]".to_string(),
            ..Default::default()
        };

        let paths = discover_posts(dir.path(), &config.post_pattern()).unwrap();
        assert_eq!(paths, vec![PathBuf::from("posts[2024]/a/index.mdx")]);
    }

    #[test]
    fn test_invalid_pattern_is_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover_posts(dir.path(), "content/[/index.mdx").unwrap_err();
        match err {
            ContentError::Discovery { pattern, .. } => {
                assert!(pattern.ends_with("content/[/index.mdx"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_slug_for() {
        assert_eq!(
            slug_for(Path::new("content/hello-world/index.mdx"), "content", "index.mdx"),
            "hello-world"
        );
        assert_eq!(
            slug_for(Path::new("posts/a/post.mdx"), "posts/", "post.mdx"),
            "a"
        );
    }
}
