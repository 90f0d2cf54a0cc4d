//! Code fence info strings: language, highlighted lines, title

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::RangeInclusive;

use crate::config::HighlightConfig;

lazy_static! {
    static ref LINE_RANGES: Regex = Regex::new(r"\{([^}]*)\}").unwrap();
    static ref TITLE: Regex = Regex::new(r#"title=(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

/// Parsed fence meta, e.g. ```` ```rust {1,3-5} title="main.rs" showLineNumbers ````
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceInfo {
    pub lang: Option<String>,
    pub highlighted: Vec<RangeInclusive<usize>>,
    pub title: Option<String>,
    pub show_line_numbers: bool,
}

impl FenceInfo {
    pub fn parse(info: &str) -> Self {
        let info = info.trim();

        let lang = info
            .split(|c: char| c.is_whitespace() || c == '{')
            .next()
            .filter(|first| !first.is_empty() && !first.contains('='))
            .map(str::to_string);

        let highlighted = LINE_RANGES
            .captures_iter(info)
            .flat_map(|caps| parse_ranges(&caps[1]))
            .collect();

        let title = TITLE.captures(info).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string())
        });

        let show_line_numbers = info.split_whitespace().any(|w| w == "showLineNumbers");

        Self {
            lang,
            highlighted,
            title,
            show_line_numbers,
        }
    }

    /// Whether the 1-based line number falls in a highlighted range
    pub fn is_highlighted(&self, line: usize) -> bool {
        self.highlighted.iter().any(|r| r.contains(&line))
    }
}

/// `1,3-5` -> [1..=1, 3..=5]; malformed pieces are ignored
fn parse_ranges(spec: &str) -> Vec<RangeInclusive<usize>> {
    spec.split(',')
        .filter_map(|part| {
            let part = part.trim();
            match part.split_once('-') {
                Some((start, end)) => {
                    let start = start.trim().parse().ok()?;
                    let end = end.trim().parse().ok()?;
                    (start <= end).then_some(start..=end)
                }
                None => {
                    let n = part.parse().ok()?;
                    Some(n..=n)
                }
            }
        })
        .collect()
}

/// Classes for one rendered line
///
/// Every line carries the base class; highlighted lines get the extra marker
/// class appended.
pub fn line_classes<'a>(
    line: usize,
    info: &FenceInfo,
    config: &'a HighlightConfig,
) -> Vec<&'a str> {
    let mut classes = vec![config.line_class.as_str()];
    if info.is_highlighted(line) {
        classes.push(config.highlighted_line_class.as_str());
    }
    classes
}
