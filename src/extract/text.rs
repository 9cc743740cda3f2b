//! Markup to plain text

use super::readability::BOILERPLATE_TAGS;
use scraper::{ElementRef, Node};

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "article",
    "section", "main", "blockquote", "pre", "figcaption", "dt", "dd", "table", "ul", "ol",
];

/// Visible text of the given elements, one block per line
pub fn render(elements: &[ElementRef<'_>]) -> String {
    let mut buf = String::new();
    for element in elements {
        collect_text(element, &mut buf);
        buf.push('\n');
    }
    normalize_whitespace(&buf)
}

fn collect_text(element: &ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(buf, text),
            Node::Element(el) => {
                let tag = el.name();
                if BOILERPLATE_TAGS.contains(&tag) {
                    continue;
                }
                let is_block = BLOCK_TAGS.contains(&tag);
                if is_block {
                    buf.push('\n');
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
                if is_block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Append text with every whitespace run, newlines included, as one space
fn push_collapsed(buf: &mut String, text: &str) {
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                buf.push(' ');
            }
            in_space = true;
        } else {
            buf.push(c);
            in_space = false;
        }
    }
}

/// Collapse runs of spaces within lines and drop blank lines
pub fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keep at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
