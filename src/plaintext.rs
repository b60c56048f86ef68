//! Markdown to plain text for the searchable `content` column.
//!
//! Renders the markdown with pulldown-cmark, keeps text and code, turns block
//! ends into newlines, and strips any raw HTML tags (Laravel's docs carry
//! `<a name="...">` anchors and the odd `<div>` wrapper).

use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser, TagEnd};
use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

pub fn markdown_to_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());

    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::Html(html) | Event::InlineHtml(html) => {
                out.push_str(&strip_tags(&html));
            }
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::Rule => out.push('\n'),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableRow,
            ) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }

    out.trim().to_string()
}

pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}
