//! Code block highlighting with light and dark themes

mod fence;
mod vscode;

pub use fence::{line_classes, FenceInfo};
pub use vscode::parse_theme;

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::{CodeThemeConfig, HighlightConfig};
use crate::error::ContentError;

/// The light and dark themes every code block is rendered with
///
/// Loaded once and shared read-only by every compile.
#[derive(Debug, Clone)]
pub struct CodeThemes {
    pub light: Theme,
    pub dark: Theme,
}

impl CodeThemes {
    /// Load both themes, resolving file paths against `base_dir`
    pub fn load(base_dir: &Path, config: &CodeThemeConfig) -> Result<Self, ContentError> {
        Ok(Self {
            light: load_theme(base_dir, &config.light)?,
            dark: load_theme(base_dir, &config.dark)?,
        })
    }
}

fn load_theme(base_dir: &Path, source: &str) -> Result<Theme, ContentError> {
    let theme_error = |message: String| ContentError::Theme {
        source_name: source.to_string(),
        message,
    };

    if source.ends_with(".json") {
        let path = base_dir.join(source);
        let content = fs::read_to_string(&path).map_err(|e| theme_error(e.to_string()))?;
        let theme = parse_theme(&content).map_err(theme_error)?;
        tracing::debug!("Loaded VS Code theme {:?}", path);
        return Ok(theme);
    }

    if source.ends_with(".tmTheme") {
        let path = base_dir.join(source);
        let theme = ThemeSet::get_theme(&path).map_err(|e| theme_error(e.to_string()))?;
        tracing::debug!("Loaded tmTheme {:?}", path);
        return Ok(theme);
    }

    let mut defaults = ThemeSet::load_defaults();
    defaults.themes.remove(source).ok_or_else(|| {
        let mut available: Vec<&String> = defaults.themes.keys().collect();
        available.sort();
        theme_error(format!("unknown built-in theme, available: {:?}", available))
    })
}

/// Syntax highlighter applied to every code block of a compiled post
pub struct Highlighter {
    syntax_set: SyntaxSet,
    themes: CodeThemes,
    config: HighlightConfig,
}

impl Highlighter {
    /// Create a highlighter from loaded themes
    pub fn new(themes: CodeThemes, config: HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            themes,
            config,
        }
    }

    /// Highlight a code block
    ///
    /// Produces one `<pre>` per theme inside a `<figure>`; the stylesheet
    /// shows the one matching the active color scheme.
    pub fn highlight(&self, code: &str, info: &FenceInfo) -> Result<String, ContentError> {
        let lang = info.lang.as_deref().unwrap_or("text");
        let syntax = self.find_syntax(lang);

        let mut html = String::from("<figure data-code-fragment>");
        if let Some(title) = &info.title {
            let _ = write!(
                html,
                r#"<figcaption data-code-title>{}</figcaption>"#,
                html_escape(title)
            );
        }

        for (name, theme) in [("light", &self.themes.light), ("dark", &self.themes.dark)] {
            let block = self
                .render_block(code, syntax, theme, name, lang, info)
                .map_err(|e| {
                    ContentError::compile(format!("failed to highlight {} code block: {}", lang, e))
                })?;
            html.push_str(&block);
        }

        html.push_str("</figure>");
        Ok(html)
    }

    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        // The bundled syntaxes have no TypeScript/JSX grammars
        let fallback = match lang {
            "ts" | "typescript" | "tsx" | "jsx" | "mjs" | "cjs" => Some("js"),
            "shell" | "zsh" | "console" => Some("sh"),
            _ => None,
        };

        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| fallback.and_then(|f| self.syntax_set.find_syntax_by_token(f)))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    fn render_block(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
        theme_name: &str,
        lang: &str,
        info: &FenceInfo,
    ) -> Result<String, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();

        for (index, line) in LinesWithEndings::from(code).enumerate() {
            let number = index + 1;
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            let regions: Vec<_> = regions
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
                .collect();
            let content = styled_line_to_highlighted_html(&regions, IncludeBackground::No)?;
            let classes = line_classes(number, info, &self.config).join(" ");
            lines.push(format!(
                r#"<span class="{}" data-line="{}">{}</span>"#,
                classes, number, content
            ));
        }

        let mut style = String::new();
        if let Some(bg) = theme.settings.background {
            let _ = write!(style, "background-color:{};", css_color(bg));
        }
        if let Some(fg) = theme.settings.foreground {
            let _ = write!(style, "color:{};", css_color(fg));
        }

        let line_numbers = if info.show_line_numbers || self.config.line_numbers {
            " data-line-numbers"
        } else {
            ""
        };

        Ok(format!(
            r#"<pre data-theme="{theme}" data-language="{lang}" style="{style}"><code data-language="{lang}" data-theme="{theme}"{numbers}>{body}</code></pre>"#,
            theme = theme_name,
            lang = html_escape(lang),
            style = style,
            numbers = line_numbers,
            body = lines.join("\n"),
        ))
    }
}

fn css_color(c: Color) -> String {
    if c.a == 0xff {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
pub(crate) fn builtin_highlighter() -> Highlighter {
    let config = CodeThemeConfig {
        light: "InspiredGitHub".to_string(),
        dark: "base16-ocean.dark".to_string(),
    };
    let themes = CodeThemes::load(Path::new("."), &config).unwrap();
    Highlighter::new(themes, HighlightConfig::default())
}
