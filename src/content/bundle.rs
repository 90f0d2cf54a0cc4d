//! ESM statements in MDX bodies and module resolution

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::ContentError;

lazy_static! {
    static ref IMPORT_FROM: Regex =
        Regex::new(r#"(?s)^import\s+(.+?)\s+from\s*['"]([^'"]+)['"]\s*;?\s*$"#).unwrap();
    static ref IMPORT_BARE: Regex = Regex::new(r#"^import\s*['"]([^'"]+)['"]\s*;?\s*$"#).unwrap();
}

/// How a bundled module's source is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Js,
    Jsx,
    Ts,
    Tsx,
    Json,
    Css,
}

/// A local module pulled into a compiled post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundledModule {
    /// Specifier as written in the import statement
    pub specifier: String,
    /// Resolved path relative to the post directory
    pub path: PathBuf,
    pub loader: Loader,
    pub source: String,
}

/// An `import` statement found at the top level of a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Imported bindings, empty for side-effect imports
    pub clause: String,
    pub specifier: String,
}

impl Import {
    /// Relative specifiers point into the post directory; everything else is external
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with("./") || self.specifier.starts_with("../")
    }
}

/// Top-level ESM found in a body, plus the markdown that remains
#[derive(Debug, Clone, Default)]
pub struct EsmSplit {
    pub imports: Vec<Import>,
    pub exports: Vec<String>,
    pub markdown: String,
}

/// A statement that continues on the next line
enum Pending {
    Import(String),
    Export(String),
}

impl Pending {
    fn push_line(&mut self, line: &str) {
        let (Pending::Import(text) | Pending::Export(text)) = self;
        text.push('\n');
        text.push_str(line);
    }

    fn unterminated(&self) -> ContentError {
        let (kind, text) = match self {
            Pending::Import(text) => ("import", text),
            Pending::Export(text) => ("export", text),
        };
        ContentError::compile(format!("unterminated {} statement: {}", kind, text.trim()))
    }
}

/// Separate `import` / `export` statements from markdown
///
/// Only lines outside fenced code blocks are considered. A statement may span
/// several lines; it must be complete before the next blank line. An export
/// is complete once its brackets are balanced.
pub fn split_esm(body: &str) -> Result<EsmSplit, ContentError> {
    let mut split = EsmSplit::default();
    let mut fence: Option<String> = None;
    let mut pending: Option<Pending> = None;

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);

        if let Some(mut statement) = pending.take() {
            if trimmed.trim().is_empty() {
                return Err(statement.unterminated());
            }
            statement.push_line(trimmed);
            match statement {
                Pending::Import(text) => match parse_import(&text) {
                    Some(import) => split.imports.push(import),
                    None => pending = Some(Pending::Import(text)),
                },
                Pending::Export(text) if is_balanced(&text) => split.exports.push(text),
                export => pending = Some(export),
            }
            continue;
        }

        if let Some(marker) = fence.as_deref() {
            if trimmed.trim_start().starts_with(marker) {
                fence = None;
            }
            split.markdown.push_str(line);
            continue;
        }

        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
            split.markdown.push_str(line);
            continue;
        }

        if trimmed.starts_with("import ") || trimmed.starts_with("import{") {
            match parse_import(trimmed) {
                Some(import) => split.imports.push(import),
                None => pending = Some(Pending::Import(trimmed.to_string())),
            }
            continue;
        }

        if trimmed.starts_with("export ") || trimmed.starts_with("export{") {
            if is_balanced(trimmed) {
                split.exports.push(trimmed.to_string());
            } else {
                pending = Some(Pending::Export(trimmed.to_string()));
            }
            continue;
        }

        split.markdown.push_str(line);
    }

    if let Some(statement) = pending {
        return Err(statement.unterminated());
    }

    Ok(split)
}

/// Every `(`, `[` and `{` is closed, skipping string literals and `//` comments
fn is_balanced(statement: &str) -> bool {
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut chars = statement.chars().peekable();

    while let Some(ch) = chars.next() {
        if let Some(open) = quote {
            match ch {
                '\\' => {
                    chars.next();
                }
                '\n' if open != '`' => quote = None,
                c if c == open => quote = None,
                _ => {}
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            _ => {}
        }
    }

    depth <= 0 && quote.is_none()
}

fn parse_import(statement: &str) -> Option<Import> {
    if let Some(caps) = IMPORT_FROM.captures(statement) {
        return Some(Import {
            clause: caps[1].trim().to_string(),
            specifier: caps[2].to_string(),
        });
    }
    IMPORT_BARE.captures(statement).map(|caps| Import {
        clause: String::new(),
        specifier: caps[1].to_string(),
    })
}

/// Opening fence marker (``` or ~~~, possibly longer) of a line
fn fence_marker(line: &str) -> Option<String> {
    let line = line.trim_start();
    for ch in ['`', '~'] {
        let count = line.chars().take_while(|&c| c == ch).count();
        if count >= 3 {
            return Some(ch.to_string().repeat(count));
        }
    }
    None
}

/// Resolve a relative import against the post directory and read it
///
/// The specifier may climb out of the post directory (`../shared/Box`);
/// the resolved path keeps those `..` components.
pub fn resolve_module(
    cwd: &Path,
    import: &Import,
    loaders: &IndexMap<String, Loader>,
) -> Result<BundledModule, ContentError> {
    let relative = normalize(Path::new(&import.specifier)).ok_or_else(|| {
        ContentError::compile(format!(
            "import `{}` is not a relative path",
            import.specifier
        ))
    })?;

    let candidates = candidate_paths(&relative, loaders);
    let found = candidates
        .into_iter()
        .find(|candidate| cwd.join(candidate).is_file())
        .ok_or_else(|| {
            ContentError::compile(format!(
                "could not resolve import `{}` from {:?}",
                import.specifier, cwd
            ))
        })?;

    let loader = loader_for(&found, loaders).ok_or_else(|| {
        ContentError::compile(format!(
            "no loader configured for `{}`",
            found.display()
        ))
    })?;

    let full = cwd.join(&found);
    let source = fs::read_to_string(&full).map_err(|e| {
        ContentError::compile(format!("failed to read module {:?}: {}", full, e))
    })?;

    tracing::debug!("Bundled {} as {:?}", found.display(), loader);

    Ok(BundledModule {
        specifier: import.specifier.clone(),
        path: found,
        loader,
        source,
    })
}

/// Exact path, then each loader extension, then `index.*` inside a directory
fn candidate_paths(relative: &Path, loaders: &IndexMap<String, Loader>) -> Vec<PathBuf> {
    let mut candidates = vec![relative.to_path_buf()];
    let display = relative.to_string_lossy();
    for ext in loaders.keys() {
        candidates.push(PathBuf::from(format!("{}{}", display, ext)));
    }
    for ext in loaders.keys() {
        candidates.push(relative.join(format!("index{}", ext)));
    }
    candidates
}

fn loader_for(path: &Path, loaders: &IndexMap<String, Loader>) -> Option<Loader> {
    let ext = path.extension()?.to_str()?;
    loaders.get(&format!(".{}", ext)).copied()
}

/// Collapse `.` and inner `..`, keeping leading `..`; `None` for absolute paths
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push(Component::ParentDir);
                }
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    #[test]
    fn test_split_imports_and_exports() {
        let body = r#"import Counter from "./Counter.js";
import { Tip, Note } from './callouts'
export const meta = { draft: false }

# Hello

<Counter />
"#;
        let split = split_esm(body).unwrap();
        assert_eq!(split.imports.len(), 2);
        assert_eq!(split.imports[0].clause, "Counter");
        assert_eq!(split.imports[0].specifier, "./Counter.js");
        assert_eq!(split.imports[1].clause, "{ Tip, Note }");
        assert_eq!(split.exports, vec!["export const meta = { draft: false }"]);
        assert_eq!(split.markdown, "\n# Hello\n\n<Counter />\n");
    }

    #[test]
    fn test_multiline_export() {
        let split = split_esm("export const meta = {\n  title: 'x',\n}\n\n# Hello\n").unwrap();
        assert_eq!(split.exports, vec!["export const meta = {\n  title: 'x',\n}"]);
        assert_eq!(split.markdown, "\n# Hello\n");

        let body = "export default function Layout({ children }) {\n  return <main>{children}</main>\n}\n\nBody with a } brace\n";
        let split = split_esm(body).unwrap();
        assert_eq!(split.exports.len(), 1);
        assert!(split.exports[0].ends_with("</main>\n}"));
        assert_eq!(split.markdown, "\nBody with a } brace\n");
    }

    #[test]
    fn test_export_brackets_in_strings_and_comments() {
        let split = split_esm("export const open = '{' // (\nText\n").unwrap();
        assert_eq!(split.exports, vec!["export const open = '{' // ("]);
        assert_eq!(split.markdown, "Text\n");
    }

    #[test]
    fn test_unterminated_export() {
        let err = split_esm("export const meta = {\n  title: 'x',\n\n# Hello\n").unwrap_err();
        assert!(err.to_string().contains("unterminated export statement"));

        let err = split_esm("export const meta = [\n  1,\n").unwrap_err();
        assert!(matches!(err, ContentError::Compile { .. }));
    }

    #[test]
    fn test_multiline_import() {
        let body = "import {\n  A,\n  B,\n} from './parts'\n\nText\n";
        let split = split_esm(body).unwrap();
        assert_eq!(split.imports.len(), 1);
        assert_eq!(split.imports[0].specifier, "./parts");
        assert_eq!(split.markdown, "\nText\n");
    }

    #[test]
    fn test_unterminated_import() {
        let body = "import {\n  A,\n\nText\n";
        let err = split_esm(body).unwrap_err();
        assert!(matches!(err, ContentError::Compile { .. }));
    }

    #[test]
    fn test_side_effect_import() {
        let split = split_esm("import './styles.css';\n").unwrap();
        assert_eq!(split.imports[0].clause, "");
        assert_eq!(split.imports[0].specifier, "./styles.css");
    }

    #[test]
    fn test_statements_inside_fences_are_markdown() {
        let body = "```js\nimport x from './x'\n```\n";
        let split = split_esm(body).unwrap();
        assert!(split.imports.is_empty());
        assert_eq!(split.markdown, body);
    }

    #[test]
    fn test_external_specifier() {
        let split = split_esm("import React from 'react'\n").unwrap();
        assert!(!split.imports[0].is_relative());
    }

    #[test]
    fn test_resolve_with_extension_lookup() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("widgets")).unwrap();
        fs::write(dir.path().join("Counter.js"), "export default () => null").unwrap();
        fs::write(dir.path().join("widgets/index.tsx"), "export const W = 1").unwrap();
        let loaders = SiteConfig::default().loaders;

        let import = Import {
            clause: "Counter".to_string(),
            specifier: "./Counter".to_string(),
        };
        let module = resolve_module(dir.path(), &import, &loaders).unwrap();
        assert_eq!(module.path, PathBuf::from("Counter.js"));
        assert_eq!(module.loader, Loader::Jsx);
        assert!(module.source.contains("export default"));

        let import = Import {
            clause: "{ W }".to_string(),
            specifier: "./widgets".to_string(),
        };
        let module = resolve_module(dir.path(), &import, &loaders).unwrap();
        assert_eq!(module.path, PathBuf::from("widgets/index.tsx"));
        assert_eq!(module.loader, Loader::Tsx);
    }

    #[test]
    fn test_unresolved_import() {
        let dir = tempfile::tempdir().unwrap();
        let import = Import {
            clause: "Missing".to_string(),
            specifier: "./Missing".to_string(),
        };
        let err = resolve_module(dir.path(), &import, &SiteConfig::default().loaders).unwrap_err();
        assert!(err.to_string().contains("could not resolve"));
    }

    #[test]
    fn test_resolve_from_sibling_directory() {
        let dir = tempfile::tempdir().unwrap();
        let post_dir = dir.path().join("post");
        fs::create_dir_all(&post_dir).unwrap();
        fs::create_dir_all(dir.path().join("shared")).unwrap();
        fs::write(dir.path().join("shared/Box.js"), "export default () => null").unwrap();
        let loaders = SiteConfig::default().loaders;

        for specifier in ["../shared/Box", "./../shared/Box.js", "./nested/../../shared/Box"] {
            let import = Import {
                clause: "Box".to_string(),
                specifier: specifier.to_string(),
            };
            let module = resolve_module(&post_dir, &import, &loaders).unwrap();
            assert_eq!(module.path, PathBuf::from("../shared/Box.js"));
            assert_eq!(module.loader, Loader::Jsx);
            assert_eq!(module.specifier, specifier);
        }
    }

    #[test]
    fn test_absolute_import_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Abs.js"), "export default 1").unwrap();
        let import = Import {
            clause: "x".to_string(),
            specifier: dir.path().join("Abs.js").to_string_lossy().into_owned(),
        };
        let err = resolve_module(dir.path(), &import, &SiteConfig::default().loaders).unwrap_err();
        assert!(err.to_string().contains("not a relative path"));
    }

    #[test]
    fn test_file_without_loader() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.bin"), "x").unwrap();
        let import = Import {
            clause: "data".to_string(),
            specifier: "./data.bin".to_string(),
        };
        let err = resolve_module(dir.path(), &import, &SiteConfig::default().loaders).unwrap_err();
        assert!(err.to_string().contains("no loader"));
    }
}
