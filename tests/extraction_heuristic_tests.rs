//! Readability heuristic over realistic page fixtures

use linkharvest::extractor::readability::{collapse_whitespace, extract_primary_text};

const NEWS_PAGE: &str = r#"
<html>
<head><title>Court ruling</title><script>window.dataLayer = [];</script></head>
<body>
  <header>
    <div class="masthead">The Example Times</div>
    <nav><a href="/">Front page</a> <a href="/politics">Politics</a> <a href="/sport">Sport</a></nav>
  </header>
  <aside class="related">
    <h4>Related</h4>
    <ul><li><a href="/a">Another story</a></li><li><a href="/b">Yet another</a></li></ul>
  </aside>
  <article>
    <h1>Appeals court narrows arbitration clause enforcement</h1>
    <p>The ruling, handed down on Tuesday, holds that boilerplate arbitration
    clauses cannot be enforced against parties who never received the
    underlying terms. Legal scholars called the decision a significant shift
    in how adhesion contracts are reviewed.</p>
    <p>The court remanded the case for further proceedings, instructing the
    lower court to consider whether the notice provided was conspicuous.</p>
  </article>
  <footer>Contact us | Terms | Privacy</footer>
</body>
</html>
"#;

#[test]
fn article_text_wins_over_navigation_and_sidebars() {
    let text = extract_primary_text(NEWS_PAGE, 50).unwrap();

    assert!(text.contains("boilerplate arbitration"));
    assert!(text.contains("remanded the case"));
    assert!(!text.contains("Front page"));
    assert!(!text.contains("Another story"));
    assert!(!text.contains("Terms | Privacy"));
    assert!(!text.contains("dataLayer"));
}

#[test]
fn whitespace_is_collapsed_in_extracted_text() {
    let text = extract_primary_text(NEWS_PAGE, 50).unwrap();
    assert!(!text.contains("  "), "no double spaces expected");
    assert!(!text.contains("\n\n"), "no blank lines expected");
}

#[test]
fn threshold_boundary_is_exact() {
    // 10 characters of content against varying thresholds
    let html = "<html><body><main>0123456789</main></body></html>";
    assert!(extract_primary_text(html, 10).is_some());
    assert!(extract_primary_text(html, 11).is_none());
}

#[test]
fn pages_of_pure_chrome_come_back_empty() {
    let html = r#"<html><body>
        <nav><a href="/">Home</a><a href="/contact">Contact</a></nav>
        <footer>All rights reserved</footer>
    </body></html>"#;
    assert!(extract_primary_text(html, 50).is_none());
}

#[test]
fn extraction_is_deterministic_for_unchanged_input() {
    let first = extract_primary_text(NEWS_PAGE, 50);
    let second = extract_primary_text(NEWS_PAGE, 50);
    assert_eq!(first, second);
}

#[test]
fn collapse_preserves_line_structure() {
    let collapsed = collapse_whitespace("First   paragraph.\n\n\n  Second    paragraph.  ");
    assert_eq!(collapsed, "First paragraph.\nSecond paragraph.");
}
