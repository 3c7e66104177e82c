//! Order-insensitive XML text

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Deref;

/// One serialized element line: indent and tag, attributes, close, then
/// optional text and end tag
static XML_ELM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^( *</?[\w:]+)(.*?)(/?>)([^<]*</[\w:]+>)?$").expect("valid regex")
});

/// Serialized XML whose equality ignores attribute order within a line
///
/// Lines must otherwise match exactly, so indentation and element order
/// are significant.
#[derive(Debug, Clone, Default, Eq)]
pub struct XmlString(String);

impl XmlString {
    /// Wrap serialized XML
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    /// The XML text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the XML text
    pub fn into_inner(self) -> String {
        self.0
    }

    fn eq_text(&self, other: &str) -> bool {
        let lines: Vec<&str> = self.0.lines().collect();
        let other_lines: Vec<&str> = other.lines().collect();
        lines.len() == other_lines.len()
            && lines
                .iter()
                .zip(other_lines.iter())
                .all(|(line, other_line)| eq_elm_lines(line, other_line))
    }
}

fn eq_elm_lines(line: &str, other: &str) -> bool {
    match (parse_line(line), parse_line(other)) {
        (Some(a), Some(b)) => {
            a.front == b.front
                && attr_seq(a.attrs) == attr_seq(b.attrs)
                && a.close == b.close
                && a.text == b.text
        }
        _ => line == other,
    }
}

struct ElmLine<'a> {
    front: &'a str,
    attrs: &'a str,
    close: &'a str,
    text: &'a str,
}

fn parse_line(line: &str) -> Option<ElmLine<'_>> {
    let caps = XML_ELM_LINE.captures(line)?;
    let group = |n| caps.get(n).map_or("", |m| m.as_str());
    Some(ElmLine {
        front: group(1),
        attrs: group(2),
        close: group(3),
        text: group(4),
    })
}

fn attr_seq(attrs: &str) -> Vec<&str> {
    let mut seq: Vec<&str> = attrs.split_whitespace().collect();
    seq.sort_unstable();
    seq
}

impl From<String> for XmlString {
    fn from(xml: String) -> Self {
        Self(xml)
    }
}

impl From<&str> for XmlString {
    fn from(xml: &str) -> Self {
        Self(xml.to_string())
    }
}

impl Deref for XmlString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for XmlString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq for XmlString {
    fn eq(&self, other: &Self) -> bool {
        self.eq_text(&other.0)
    }
}

impl PartialEq<str> for XmlString {
    fn eq(&self, other: &str) -> bool {
        self.eq_text(other)
    }
}

impl PartialEq<&str> for XmlString {
    fn eq(&self, other: &&str) -> bool {
        self.eq_text(other)
    }
}

impl PartialEq<String> for XmlString {
    fn eq(&self, other: &String) -> bool {
        self.eq_text(other)
    }
}
