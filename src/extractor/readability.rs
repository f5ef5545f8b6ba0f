//! Readability-style primary-text extraction
//!
//! Finds the main content of an arbitrary page by checking semantic
//! containers in priority order, discarding boilerplate chrome, and keeping
//! the candidate with the most visible text. Falls back to `<body>` when no
//! semantic container exists.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Container selectors in priority order
///
/// Semantic landmarks first, then the class/id conventions blog and CMS
/// themes converge on. Order matters only for tie-breaking; the largest
/// text block wins regardless of which selector matched it.
const CANDIDATE_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#main-content",
    ".main-content",
    "#content",
    ".content",
    ".post-content",
    ".entry-content",
    "[itemprop='articleBody']",
];

/// Elements whose subtree is never visible content
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "template", "nav", "header", "footer", "aside",
];

static CANDIDATES: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CANDIDATE_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).expect("BUG: hardcoded candidate selector is invalid"))
        .collect()
});

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Recursively collect text, skipping boilerplate subtrees
fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    if BOILERPLATE_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect_visible_text(child_el, out);
            // Element boundaries separate words that inline markup would
            // otherwise glue together
            out.push('\n');
        }
    }
}

/// Collapse runs of whitespace, one logical line per text chunk
///
/// Mirrors the line-oriented cleanup the stores have always carried: split
/// into lines, trim each, drop empties, re-join with single newlines.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_text_of(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_visible_text(element, &mut raw);
    collapse_whitespace(&raw)
}

/// Visible body text, boilerplate removed, whitespace collapsed
///
/// Used both as the extraction fallback and as the haystack for
/// challenge-page marker matching.
#[must_use]
pub fn visible_body_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    doc.select(&BODY_SELECTOR)
        .next()
        .map(visible_text_of)
        .unwrap_or_default()
}

/// Extract the page's primary text
///
/// Returns `None` when the best block is shorter than `min_length` - the
/// caller records that as an `empty` extraction rather than storing noise.
#[must_use]
pub fn extract_primary_text(html: &str, min_length: usize) -> Option<String> {
    let doc = Html::parse_document(html);

    let mut best: Option<String> = None;
    for selector in CANDIDATES.iter() {
        for element in doc.select(selector) {
            let text = visible_text_of(element);
            if text.len() > best.as_ref().map_or(0, String::len) {
                best = Some(text);
            }
        }
    }

    // No semantic container at all: the body fallback keeps pages with
    // unconventional markup extractable. (Body is a superset of every
    // candidate, so it must not compete when a container did match.)
    if best.is_none() {
        best = doc.select(&BODY_SELECTOR).next().map(visible_text_of);
    }

    best.filter(|text| text.len() >= min_length)
}
