//! Shared test support: fixtures written as XML text
//!
//! A builder writes the XML an element is expected to serialize to, so
//! tests can compare an edited tree with the document they expect.

#![allow(dead_code)]

use oxml::{nsdecls, parse_xml, Element, XmlString};

/// Fluent writer of one element and its descendants
#[derive(Debug, Clone)]
pub struct XmlBuilder {
    tag: &'static str,
    nspfxs: Vec<&'static str>,
    attrs: Vec<(String, String)>,
    children: Vec<XmlBuilder>,
    text: Option<String>,
}

impl XmlBuilder {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            nspfxs: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Declare the prefixes the element's tag uses
    pub fn with_nsdecls(mut self, prefixes: &[&'static str]) -> Self {
        self.nspfxs = prefixes.to_vec();
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: XmlBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Element parsed from the builder's XML
    pub fn element(&self) -> Element {
        parse_xml(&self.xml_text()).expect("builder XML parses")
    }

    /// Expected serialization
    pub fn xml(&self) -> XmlString {
        XmlString::from(self.xml_text())
    }

    fn xml_text(&self) -> String {
        let mut out = String::new();
        self.write(&mut out, 0);
        out
    }

    fn start_tag(&self) -> String {
        let mut start = format!("<{}", self.tag);
        if !self.nspfxs.is_empty() {
            start.push(' ');
            start.push_str(&nsdecls(&self.nspfxs).expect("known prefixes"));
        }
        for (name, value) in &self.attrs {
            start.push_str(&format!(" {}=\"{}\"", name, value));
        }
        start
    }

    fn write(&self, out: &mut String, indent: usize) {
        let pad = " ".repeat(indent);
        let start = self.start_tag();
        match (&self.text, self.children.is_empty()) {
            (None, true) => out.push_str(&format!("{}{}/>\n", pad, start)),
            (Some(text), true) => {
                out.push_str(&format!("{}{}>{}</{}>\n", pad, start, text, self.tag))
            }
            (_, false) => {
                out.push_str(&format!("{}{}>\n", pad, start));
                for child in &self.children {
                    child.write(out, indent + 2);
                }
                out.push_str(&format!("{}</{}>\n", pad, self.tag));
            }
        }
    }
}
