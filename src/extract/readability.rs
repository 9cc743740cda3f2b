//! Main-content detection in the manner of Readability
//!
//! Paragraph-like nodes vote for their parent and grandparent; the best
//! scoring container, discounted by link density, is the article. Siblings
//! that score close to it are kept with it.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::hash::Hash;

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p, pre, td, blockquote").expect("valid selector"));

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));

static FALLBACK_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article", "main", "[role=\"main\"]", "body"]
        .iter()
        .map(|s| Selector::parse(s).expect("valid selector"))
        .collect()
});

static POSITIVE_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|main|page|post|text|blog|story")
        .expect("valid regex")
});

static NEGATIVE_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)banner|combx|comment|contact|foot|masthead|menu|meta|nav|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|social|tags|tool|widget|(^|[\s_-])ads?([\s_-]|$)",
    )
    .expect("valid regex")
});

/// Elements whose subtree never holds article text
pub(crate) const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe", "svg",
];

/// Minimum paragraph length, in characters, that earns a vote
const MIN_PARAGRAPH_CHARS: usize = 25;

struct Candidates<'a, K> {
    index: HashMap<K, usize>,
    entries: Vec<(ElementRef<'a>, f64)>,
}

impl<'a, K: Hash + Eq> Candidates<'a, K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn add(&mut self, key: K, element: ElementRef<'a>, score: f64) {
        let entries = &mut self.entries;
        let slot = *self.index.entry(key).or_insert_with(|| {
            entries.push((element, initial_score(&element)));
            entries.len() - 1
        });
        self.entries[slot].1 += score;
    }

    fn score_of(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }
}

/// Locate the elements holding the main content of a document
///
/// Returns `None` when nothing readable can be identified.
pub fn main_content(document: &Html) -> Option<Vec<ElementRef<'_>>> {
    let mut candidates = Candidates::new();

    for paragraph in document.select(&PARAGRAPH_SELECTOR) {
        if in_boilerplate(&paragraph) {
            continue;
        }

        let text = normalized_text(&paragraph);
        let length = text.chars().count();
        if length < MIN_PARAGRAPH_CHARS {
            continue;
        }

        let score = 1.0 + text.matches(',').count() as f64 + (length / 100).min(3) as f64;

        let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        candidates.add(parent.id(), parent, score);

        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            candidates.add(grandparent.id(), grandparent, score / 2.0);
        }
    }

    for entry in candidates.entries.iter_mut() {
        entry.1 *= 1.0 - link_density(&entry.0);
    }

    let best = candidates
        .entries
        .iter()
        .fold(None::<(ElementRef<'_>, f64)>, |best, &(el, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((el, score)),
        });

    match best {
        Some((top, top_score)) if top_score > 0.0 => {
            Some(with_siblings(top, top_score, |el| candidates.score_of(&el.id())))
        }
        _ => fallback(document),
    }
}

fn with_siblings<'a>(
    top: ElementRef<'a>,
    top_score: f64,
    score_of: impl Fn(&ElementRef<'a>) -> Option<f64>,
) -> Vec<ElementRef<'a>> {
    let threshold = (top_score * 0.2).max(10.0);

    let Some(parent) = top.parent() else {
        return vec![top];
    };

    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| {
            if sibling.id() == top.id() {
                return true;
            }
            if score_of(sibling).is_some_and(|s| s >= threshold) {
                return true;
            }
            if sibling.value().name() != "p" {
                return false;
            }
            let text = normalized_text(sibling);
            let length = text.chars().count();
            let density = link_density(sibling);
            (length > 80 && density < 0.25)
                || (length > 0 && density == 0.0 && text.contains(". "))
        })
        .collect()
}

fn fallback(document: &Html) -> Option<Vec<ElementRef<'_>>> {
    FALLBACK_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .find(|el| !normalized_text(el).is_empty())
            .map(|el| vec![el])
    })
}

fn initial_score(element: &ElementRef<'_>) -> f64 {
    let tag_bias = match element.value().name() {
        "article" => 10.0,
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    tag_bias + class_weight(element)
}

fn class_weight(element: &ElementRef<'_>) -> f64 {
    let mut weight = 0.0;
    for hint in [element.value().attr("class"), element.value().attr("id")]
        .into_iter()
        .flatten()
    {
        if NEGATIVE_HINT.is_match(hint) {
            weight -= 25.0;
        }
        if POSITIVE_HINT.is_match(hint) {
            weight += 25.0;
        }
    }
    weight
}

fn in_boilerplate(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| BOILERPLATE_TAGS.contains(&a.value().name()))
}

fn normalized_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Share of an element's text that sits inside links
fn link_density(element: &ElementRef<'_>) -> f64 {
    let total = normalized_text(element).chars().count();
    if total == 0 {
        return 0.0;
    }
    let linked: usize = element
        .select(&LINK_SELECTOR)
        .map(|a| normalized_text(&a).chars().count())
        .sum();
    (linked as f64 / total as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(elements: &[ElementRef<'_>]) -> Vec<String> {
        elements
            .iter()
            .map(|e| {
                let v = e.value();
                format!("{}#{}", v.name(), v.attr("id").unwrap_or(""))
            })
            .collect()
    }

    #[test]
    fn test_link_heavy_block_loses() {
        let html = Html::parse_document(
            r#"<body>
                <div id="links">
                  <p><a href="/1">A long list of links that point to other stories, one, two</a></p>
                  <p><a href="/2">Another long list of links that point to other stories, three</a></p>
                </div>
                <div id="story">
                  <p>The Eiffel Tower was completed in 1889, and it quickly became a symbol of Paris.</p>
                </div>
            </body>"#,
        );

        let content = main_content(&html).unwrap();
        assert!(names(&content).contains(&"div#story".to_string()));
        assert!(!names(&content).contains(&"div#links".to_string()));
    }

    #[test]
    fn test_negative_class_hint_penalized() {
        let el_html = Html::parse_fragment(r#"<div class="comment-list">x</div>"#);
        let div = el_html
            .select(&Selector::parse("div").unwrap())
            .next()
            .unwrap();
        assert_eq!(initial_score(&div), 5.0 - 25.0);
    }

    #[test]
    fn test_positive_class_hint_rewarded() {
        let el_html = Html::parse_fragment(r#"<article class="post-body">x</article>"#);
        let article = el_html
            .select(&Selector::parse("article").unwrap())
            .next()
            .unwrap();
        assert_eq!(initial_score(&article), 10.0 + 25.0);
    }

    #[test]
    fn test_sibling_paragraphs_kept() {
        let html = Html::parse_document(
            r#"<body><section>
                <div id="main">
                  <p>First paragraph of the story, with commas, several of them, here.</p>
                  <p>Second paragraph of the story, also with commas, and more text.</p>
                </div>
                <p id="tail">A trailing paragraph outside the container. It still reads like prose.</p>
                <p id="menu"><a href="/x">Menu link</a></p>
            </section></body>"#,
        );

        let content = main_content(&html).unwrap();
        let found = names(&content);
        assert!(found.contains(&"div#main".to_string()));
        assert!(found.contains(&"p#tail".to_string()));
        assert!(!found.contains(&"p#menu".to_string()));
    }

    #[test]
    fn test_nothing_readable() {
        let html = Html::parse_document("<html><body></body></html>");
        assert!(main_content(&html).is_none());
    }
}
