//! Reference list generation from citation links.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::model::{Citation, Document};

use super::html::{escape_html, markup};

/// Date format used in "Accessed" notes.
pub const ACCESSED_FORMAT: &str = "%Y-%m-%d";

fn anchor_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<a\s([^>]*)>(.*?)</a>").expect("valid anchor regex"))
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z-]+)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
    })
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag regex"))
}

/// Collect citation anchors from produced markup, in document order.
pub fn collect_citations(markup: &str) -> Vec<Citation> {
    anchor_regex()
        .captures_iter(markup)
        .filter_map(|caps| {
            let attrs = caps.get(1)?.as_str();
            let mut href = None;
            let mut is_citation = false;

            for attr in attr_regex().captures_iter(attrs) {
                match attr[1].to_ascii_lowercase().as_str() {
                    "href" => href = Some(unescape_html(&attr[2])),
                    "class" => {
                        is_citation = attr[2]
                            .split_whitespace()
                            .any(|class| class == markup::CITATION_CLASS)
                    }
                    _ => {}
                }
            }

            if !is_citation {
                return None;
            }
            let inner = caps.get(2).map_or("", |m| m.as_str());
            let text = unescape_html(&tag_regex().replace_all(inner, ""));
            Some(Citation {
                text: text.trim().to_string(),
                url: href.unwrap_or_default(),
            })
        })
        .collect()
}

fn unescape_html(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{00A0}")
        .replace("&amp;", "&")
}

/// A numbered reference list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bibliography {
    entries: Vec<Citation>,
}

impl Bibliography {
    /// Create a bibliography from citations.
    pub fn new(entries: Vec<Citation>) -> Self {
        Self { entries }
    }

    /// Build from produced markup.
    pub fn from_markup(markup: &str) -> Self {
        Self::new(collect_citations(markup))
    }

    /// Build from a parsed document.
    pub fn from_document(doc: &Document) -> Self {
        Self::new(doc.citations())
    }

    /// Citation entries in order.
    pub fn entries(&self) -> &[Citation] {
        &self.entries
    }

    /// Check if there are no citations.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render the reference list.
    pub fn render_html(&self, accessed: NaiveDate) -> String {
        let date = accessed.format(ACCESSED_FORMAT).to_string();
        let mut out = format!(
            "<div class=\"{}\">\
             <h2 class=\"text-2xl font-bold mb-6\">References</h2>\
             <ul class=\"list-none space-y-4\">",
            markup::BIBLIOGRAPHY
        );

        for (i, entry) in self.entries.iter().enumerate() {
            out.push_str(&format!(
                "<li class=\"pl-8 -indent-8 text-slate-700\">[{}] {}. Available at: \
                 <span class=\"italic underline text-blue-600\">{}</span> (Accessed: {}).</li>",
                i + 1,
                escape_html(&entry.text),
                escape_html(&entry.url),
                date
            ));
        }

        out.push_str("</ul></div>");
        out
    }

    /// Append the reference list to markup.
    pub fn append_to(&self, markup: &str, accessed: NaiveDate) -> String {
        format!("{}\n{}", markup.trim_end(), self.render_html(accessed))
    }

    /// Render plain text entries, one per line.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("[{}] {}. Available at: {}", i + 1, entry.text, entry.url))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
