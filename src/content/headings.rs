//! Heading extraction for the table of contents

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// One to four `#` at line start followed by whitespace.
    static ref HEADING_LINE: Regex = Regex::new(r"^#{1,4}\s").unwrap();
}

/// A heading found in a post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// URL-safe anchor derived from the text
    pub id: String,
    /// Display text without the leading markers
    pub text: String,
    /// Number of leading markers (1-4)
    pub level: u8,
}

/// Anchor identifier for a heading's display text
///
/// Duplicate texts produce duplicate ids; callers that need unique anchors
/// must disambiguate them.
pub fn heading_id(text: &str) -> String {
    slug::slugify(text)
}

/// Extract headings from raw post content, in source order
///
/// This is a line-oriented scan with no notion of fenced code blocks: a
/// `# comment` line inside a shell snippet is reported as a heading.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    content
        .split('\n')
        .filter(|line| HEADING_LINE.is_match(line))
        .map(|line| {
            let level = line.bytes().take_while(|&b| b == b'#').count() as u8;
            let text = line.trim_start_matches('#').trim().to_string();
            Heading {
                id: heading_id(&text),
                text,
                level,
            }
        })
        .collect()
}
