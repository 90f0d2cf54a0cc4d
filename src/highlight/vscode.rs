//! VS Code color themes converted to syntect themes

use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use syntect::highlighting::{
    Color, FontStyle, ScopeSelectors, StyleModifier, Theme, ThemeItem, ThemeSettings,
};

#[derive(Debug, Deserialize)]
struct VsCodeTheme {
    name: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
    #[serde(default, rename = "tokenColors")]
    token_colors: Vec<TokenColor>,
}

#[derive(Debug, Deserialize)]
struct TokenColor {
    #[serde(default)]
    scope: Option<Scope>,
    #[serde(default)]
    settings: TokenSettings,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scope {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct TokenSettings {
    foreground: Option<String>,
    background: Option<String>,
    #[serde(rename = "fontStyle")]
    font_style: Option<String>,
}

/// Convert a VS Code theme document into a syntect theme
///
/// `colors` supplies editor-wide settings, `tokenColors` entries become scope
/// rules. An entry without a scope overrides the global colors, matching
/// tmTheme semantics.
pub fn parse_theme(json: &str) -> Result<Theme, String> {
    let doc: VsCodeTheme = serde_json::from_str(json).map_err(|e| e.to_string())?;

    let editor = |key: &str| doc.colors.get(key).and_then(|c| parse_color(c));

    let mut settings = ThemeSettings {
        foreground: editor("editor.foreground"),
        background: editor("editor.background"),
        caret: editor("editorCursor.foreground"),
        line_highlight: editor("editor.lineHighlightBackground"),
        selection: editor("editor.selectionBackground"),
        gutter_foreground: editor("editorLineNumber.foreground"),
        ..ThemeSettings::default()
    };

    let mut scopes = Vec::new();
    for token in &doc.token_colors {
        let style = StyleModifier {
            foreground: token.settings.foreground.as_deref().and_then(parse_color),
            background: token.settings.background.as_deref().and_then(parse_color),
            font_style: token.settings.font_style.as_deref().map(parse_font_style),
        };

        let selector = match &token.scope {
            None => {
                settings.foreground = style.foreground.or(settings.foreground);
                settings.background = style.background.or(settings.background);
                continue;
            }
            Some(Scope::One(s)) => s.clone(),
            Some(Scope::Many(list)) => list.join(", "),
        };

        if selector.trim().is_empty() {
            continue;
        }

        let scope = ScopeSelectors::from_str(&selector)
            .map_err(|e| format!("invalid scope `{}`: {:?}", selector, e))?;
        scopes.push(ThemeItem { scope, style });
    }

    Ok(Theme {
        name: doc.name,
        settings,
        scopes,
        ..Theme::default()
    })
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    let (r, g, b, a) = match hex.len() {
        3 => (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 0xff),
        4 => (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, digit(3)? * 17),
        6 => (pair(0)?, pair(2)?, pair(4)?, 0xff),
        8 => (pair(0)?, pair(2)?, pair(4)?, pair(6)?),
        _ => {
            tracing::debug!("Ignoring unsupported color {:?}", s);
            return None;
        }
    };

    Some(Color { r, g, b, a })
}

fn parse_font_style(s: &str) -> FontStyle {
    let mut style = FontStyle::empty();
    for word in s.split_whitespace() {
        match word {
            "bold" => style |= FontStyle::BOLD,
            "italic" => style |= FontStyle::ITALIC,
            "underline" => style |= FontStyle::UNDERLINE,
            _ => {}
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;

    const THEME: &str = r##"{
  "name": "Test Dark",
  "colors": {
    "editor.background": "#0d1117",
    "editor.foreground": "#c9d1d9"
  },
  "tokenColors": [
    { "settings": { "foreground": "#e6edf3" } },
    { "scope": "comment", "settings": { "foreground": "#8b949e", "fontStyle": "italic" } },
    { "scope": ["keyword", "storage.type"], "settings": { "foreground": "#ff7b72" } },
    { "scope": "markup.bold", "settings": { "fontStyle": "bold underline" } }
  ]
}"##;

    #[test]
    fn test_parse_theme() {
        let theme = parse_theme(THEME).unwrap();
        assert_eq!(theme.name.as_deref(), Some("Test Dark"));
        assert_eq!(
            theme.settings.background,
            Some(Color { r: 0x0d, g: 0x11, b: 0x17, a: 0xff })
        );
        // the unscoped entry overrides editor.foreground
        assert_eq!(
            theme.settings.foreground,
            Some(Color { r: 0xe6, g: 0xed, b: 0xf3, a: 0xff })
        );
        assert_eq!(theme.scopes.len(), 3);
        assert_eq!(theme.scopes[0].style.font_style, Some(FontStyle::ITALIC));
        assert_eq!(
            theme.scopes[2].style.font_style,
            Some(FontStyle::BOLD | FontStyle::UNDERLINE)
        );
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color("#fff"), Some(Color { r: 255, g: 255, b: 255, a: 255 }));
        assert_eq!(parse_color("#00000080"), Some(Color { r: 0, g: 0, b: 0, a: 0x80 }));
        assert_eq!(parse_color("red"), None);
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_theme("{ not json").is_err());
    }
}
