//! Site configuration (_config.yml)

use glob::Pattern;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::Loader;
use crate::error::ContentError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Directory
    /// Directory scanned when listing posts
    pub content_dir: String,
    /// Directory holding the built post folders that get compiled
    pub build_dir: String,
    /// Entry document inside every post folder
    pub post_filename: String,

    // Writing
    #[serde(default)]
    pub code_theme: CodeThemeConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    /// Module loaders by file extension, in resolution order
    #[serde(default = "default_loaders")]
    pub loaders: IndexMap<String, Loader>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: "content".to_string(),
            build_dir: "_dist-content".to_string(),
            post_filename: "index.mdx".to_string(),
            code_theme: CodeThemeConfig::default(),
            highlight: HighlightConfig::default(),
            loaders: default_loaders(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|e| ContentError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Ok(config)
    }

    /// Glob pattern (relative to the base directory) matching every entry document
    ///
    /// Only the `*` between the two names is a wildcard.
    pub fn post_pattern(&self) -> String {
        format!(
            "{}/*/{}",
            Pattern::escape(self.content_dir.trim_end_matches('/')),
            Pattern::escape(&self.post_filename)
        )
    }
}

/// Babel writes React components with a `.js` extension, so `.js` is parsed as JSX.
fn default_loaders() -> IndexMap<String, Loader> {
    let mut loaders = IndexMap::new();
    loaders.insert(".js".to_string(), Loader::Jsx);
    loaders.insert(".jsx".to_string(), Loader::Jsx);
    loaders.insert(".ts".to_string(), Loader::Ts);
    loaders.insert(".tsx".to_string(), Loader::Tsx);
    loaders.insert(".json".to_string(), Loader::Json);
    loaders.insert(".css".to_string(), Loader::Css);
    loaders
}

/// Light and dark code themes
///
/// Each value is a path to a VS Code `.json` theme, a path to a `.tmTheme`
/// file, or the name of a theme bundled with syntect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeThemeConfig {
    pub light: String,
    pub dark: String,
}

impl Default for CodeThemeConfig {
    fn default() -> Self {
        Self {
            light: "assets/light-colorblind.json".to_string(),
            dark: "assets/dark-default.json".to_string(),
        }
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Class carried by every line span
    pub line_class: String,
    /// Extra class added to lines selected in the fence meta (`{1,3-4}`)
    pub highlighted_line_class: String,
    /// Emit `data-line-numbers` on every block, not only `showLineNumbers` ones
    pub line_numbers: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            line_class: "line".to_string(),
            highlighted_line_class: "highlighted".to_string(),
            line_numbers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.build_dir, "_dist-content");
        assert_eq!(config.post_filename, "index.mdx");
        assert_eq!(config.loaders.get(".js"), Some(&Loader::Jsx));
        assert_eq!(config.highlight.highlighted_line_class, "highlighted");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
content_dir: posts
post_filename: post.mdx
code_theme:
  light: InspiredGitHub
highlight:
  highlighted_line_class: hl
loaders:
  .js: js
  .mjs: js
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.build_dir, "_dist-content");
        assert_eq!(config.post_filename, "post.mdx");
        assert_eq!(config.code_theme.light, "InspiredGitHub");
        assert_eq!(config.code_theme.dark, "assets/dark-default.json");
        assert_eq!(config.highlight.highlighted_line_class, "hl");
        assert_eq!(config.highlight.line_class, "line");
        assert_eq!(config.loaders.len(), 2);
        assert_eq!(config.loaders.get(".mjs"), Some(&Loader::Js));
    }

    #[test]
    fn test_post_pattern() {
        let config = SiteConfig {
            content_dir: "content/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.post_pattern(), "content/*/index.mdx");

        let config = SiteConfig {
            content_dir: "drafts[old]".to_string(),
            post_filename: "*.mdx".to_string(),
            ..Default::default()
        };
        assert_eq!(config.post_pattern(), "drafts[[]old[]]/*/[*].mdx");
    }
}
