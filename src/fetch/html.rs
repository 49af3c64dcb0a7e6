//! Minimal markup helpers for the scraped providers.
//!
//! The pages are not parsed as documents: sources locate the fragments they
//! need by marker and pattern, then reduce them to plain text here.

use crate::display::clean_chars;
use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").unwrap());

static ANCHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<a\s([^>]*)>(.*?)</a>").unwrap());

static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p(?:\s[^>]*)?>(.*?)</p>").unwrap());

/// Decodes the character references that show up in news and sighting pages.
///
/// Unknown named references are left as they are.
pub fn decode_entities(s: &str) -> String {
    ENTITY_REGEX
        .replace_all(s, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                named_entity(name)
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "deg" => '\u{00B0}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        _ => return None,
    };
    Some(c)
}

/// Reduces a markup fragment to clean display text.
pub fn to_text(fragment: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(fragment, "");
    let decoded = decode_entities(&without_tags);
    let collapsed = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
    clean_chars(&collapsed)
}

/// A link found in a fragment: its attribute text and inner markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub attributes: String,
    pub inner: String,
}

impl Anchor {
    /// Value of a double-quoted attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        let needle = format!("{name}=\"");
        let start = self.attributes.find(&needle)? + needle.len();
        let len = self.attributes[start..].find('"')?;
        Some(&self.attributes[start..start + len])
    }

    /// Whether the `class` attribute lists `class_name`.
    pub fn has_class(&self, class_name: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }
}

/// All anchors in a fragment, in document order.
pub fn anchors(fragment: &str) -> Vec<Anchor> {
    ANCHOR_REGEX
        .captures_iter(fragment)
        .map(|caps| Anchor {
            attributes: caps[1].to_string(),
            inner: caps[2].to_string(),
        })
        .collect()
}

/// Text of every non-empty paragraph in a fragment.
pub fn paragraphs(fragment: &str) -> Vec<String> {
    PARAGRAPH_REGEX
        .captures_iter(fragment)
        .map(|caps| to_text(&caps[1]))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splits a page into the chunks that follow each occurrence of a class name.
///
/// The text before the first occurrence is dropped.
pub fn chunks_after_class<'a>(page: &'a str, class_name: &str) -> Vec<&'a str> {
    let marker = format!("class=\"{class_name}");
    page.split(marker.as_str()).skip(1).collect()
}
