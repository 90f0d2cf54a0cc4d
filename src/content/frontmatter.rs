//! Front-matter parsing

use chrono::{DateTime, Local, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Front-matter data from a post
///
/// No schema is enforced: every key of the header block is kept, in the
/// order it was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrontMatter(IndexMap<String, serde_yaml::Value>);

/// Header block language, taken from the text after the opening `---`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Yaml,
    Json,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let Some(after_open) = content.strip_prefix("---") else {
            return Ok((Self::default(), content));
        };

        // `----` is a thematic break, not a delimiter
        if after_open.starts_with('-') {
            return Ok((Self::default(), content));
        }

        let (tag, rest) = match after_open.find('\n') {
            Some(pos) => (&after_open[..pos], &after_open[pos + 1..]),
            None => (after_open, ""),
        };

        let language = match tag.trim() {
            "" | "yaml" | "yml" => Language::Yaml,
            "json" => Language::Json,
            other => {
                return Err(ContentError::front_matter(format!(
                    "unsupported front-matter language `{}`",
                    other
                )))
            }
        };

        let (block, body) = split_block(rest).ok_or_else(|| {
            ContentError::front_matter("missing closing `---` delimiter")
        })?;

        let fm = match language {
            Language::Yaml => Self::parse_yaml(block)?,
            Language::Json => Self::parse_json(block)?,
        };

        Ok((fm, body))
    }

    fn parse_yaml(block: &str) -> Result<Self, ContentError> {
        if block.trim().is_empty() {
            return Ok(Self::default());
        }

        let map: Option<IndexMap<String, serde_yaml::Value>> = serde_yaml::from_str(block)
            .map_err(|e| {
                ContentError::front_matter(format!("failed to parse YAML front-matter: {}", e))
            })?;

        Ok(Self(map.unwrap_or_default()))
    }

    fn parse_json(block: &str) -> Result<Self, ContentError> {
        if block.trim().is_empty() {
            return Ok(Self::default());
        }

        let map: IndexMap<String, serde_json::Value> = serde_json::from_str(block)
            .map_err(|e| {
                ContentError::front_matter(format!("failed to parse JSON front-matter: {}", e))
            })?;

        let mut fm = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            let value = serde_yaml::to_value(value).map_err(|e| {
                ContentError::front_matter(format!("unsupported value for `{}`: {}", key, e))
            })?;
            fm.insert(key, value);
        }

        Ok(Self(fm))
    }

    /// Look up a raw value
    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.0.get(key)
    }

    /// Look up a string value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// The `title` field, if it is a string
    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Parse the `date` field into a DateTime
    pub fn date(&self) -> Option<DateTime<Local>> {
        self.get_str("date").and_then(parse_date_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_yaml::Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split the header block from the body at the first line that is exactly `---`
fn split_block(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    // RFC 3339 first so explicit offsets are honoured
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return dt.and_local_timezone(Local).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest();
        }
    }

    None
}
