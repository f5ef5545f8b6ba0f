//! JavaScript evaluated on result pages
//!
//! One pass over the live DOM collects every candidate href in document
//! order. Running inside the page keeps dynamically injected anchors
//! visible, which a static HTML parse would miss.

/// Combined selector for rendered result containers
///
/// Covers the container markup of the major engines; presence of any match
/// means the result list has rendered. Kept deliberately broad - the
/// harvester treats a page with none of these as having zero results, so a
/// false negative only costs an empty page, never a crash.
pub const RESULT_CONTAINER_SELECTOR: &str =
    "div.g, div[data-ved], div.yuRUbf, article[data-testid='result'], #links .result, #b_results";

/// Collect candidate hrefs in document order
///
/// All anchors first (document order), then anchors inside known result
/// containers to catch late-injected results. The page-side `seen` set
/// keeps the list free of within-page duplicates; normalization and
/// store-level dedup happen on the Rust side.
pub const COLLECT_LINKS_SCRIPT: &str = r#"
    (() => {
        const links = [];
        const seen = new Set();
        const push = (href) => {
            if (href && !seen.has(href)) {
                seen.add(href);
                links.push(href);
            }
        };

        document.querySelectorAll('a[href]').forEach(a => {
            push(a.getAttribute('href'));
        });

        const containerSelectors = [
            'div.g',
            'div[data-ved]',
            'div.yuRUbf',
            "article[data-testid='result']",
            'h3'
        ];
        containerSelectors.forEach(selector => {
            document.querySelectorAll(selector).forEach(container => {
                const anchor = container.querySelector('a[href]');
                if (anchor) {
                    push(anchor.getAttribute('href'));
                }
            });
        });

        return links;
    })()
"#;
