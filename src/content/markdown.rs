//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use super::headings::heading_id;
use crate::error::ContentError;
use crate::highlight::{FenceInfo, Highlighter};

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer<'h> {
    highlighter: &'h Highlighter,
}

/// Heading events held back until the text (and so the anchor) is known
struct PendingHeading<'a> {
    level: HeadingLevel,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    text: String,
    events: Vec<Event<'a>>,
}

impl<'h> MarkdownRenderer<'h> {
    /// Create a new markdown renderer
    pub fn new(highlighter: &'h Highlighter) -> Self {
        Self { highlighter }
    }

    /// Render markdown to HTML
    ///
    /// Levels 1-4 get an `id` computed the same way as the table of contents
    /// so anchors line up. Raw HTML and JSX blocks pass through untouched.
    pub fn render(&self, markdown: &str) -> Result<String, ContentError> {
        // Front-matter is stripped before this point, and heading attributes
        // stay off so `{#id}` text is part of the heading like in the TOC.
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(FenceInfo, String)> = None;
        let mut heading: Option<PendingHeading> = None;

        for event in parser {
            if let Some((info, code)) = &mut code_block {
                match event {
                    Event::Text(text) => code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlighter.highlight(code, info)?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let info = match kind {
                        CodeBlockKind::Fenced(info) => FenceInfo::parse(&info),
                        CodeBlockKind::Indented => FenceInfo::default(),
                    };
                    code_block = Some((info, String::new()));
                }
                Event::Start(Tag::Heading {
                    level,
                    id: None,
                    classes,
                    attrs,
                }) if is_toc_level(level) => {
                    heading = Some(PendingHeading {
                        level,
                        classes,
                        attrs,
                        text: String::new(),
                        events: Vec::new(),
                    });
                }
                Event::End(TagEnd::Heading(level)) if heading.is_some() => {
                    if let Some(pending) = heading.take() {
                        let id = heading_id(pending.text.trim());
                        events.push(Event::Start(Tag::Heading {
                            level: pending.level,
                            id: Some(CowStr::from(id)),
                            classes: pending.classes,
                            attrs: pending.attrs,
                        }));
                        events.extend(pending.events);
                        events.push(Event::End(TagEnd::Heading(level)));
                    }
                }
                other => match heading.as_mut() {
                    Some(pending) => {
                        if let Event::Text(text) | Event::Code(text) = &other {
                            pending.text.push_str(text);
                        }
                        pending.events.push(other);
                    }
                    None => events.push(other),
                },
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }
}

fn is_toc_level(level: HeadingLevel) -> bool {
    matches!(
        level,
        HeadingLevel::H1 | HeadingLevel::H2 | HeadingLevel::H3 | HeadingLevel::H4
    )
}
