//! Response classification for extraction attempts
//!
//! Decides, before any text extraction runs, whether a fetched page is a
//! bot challenge, an access denial, or something other than an HTML
//! document. All checks are pure so the policy is directly testable.

use crate::session::PageResponse;

/// HTTP statuses that signal an anti-bot or access-denied response
const BLOCKED_STATUSES: &[i64] = &[403, 429];

/// Whether an HTTP status alone marks the response as blocked
#[must_use]
pub fn is_blocked_status(status: i64) -> bool {
    BLOCKED_STATUSES.contains(&status)
}

/// Whether rendered body text matches the challenge-marker table
///
/// Markers are matched as lowercase substrings; the table is configuration,
/// not code, because challenge pages change faster than releases.
#[must_use]
pub fn body_matches_markers(body_text: &str, markers: &[String]) -> bool {
    if markers.is_empty() {
        return false;
    }
    let lowered = body_text.to_lowercase();
    markers
        .iter()
        .any(|marker| lowered.contains(&marker.to_lowercase()))
}

/// Whether a MIME type is an HTML-derived text document
///
/// Anything else (PDFs, images, JSON APIs, octet streams) is recorded as
/// `non_text` without attempting extraction.
#[must_use]
pub fn is_text_document(mime_type: &str) -> bool {
    let mime = mime_type
        .split(';')
        .next()
        .unwrap_or(mime_type)
        .trim()
        .to_lowercase();
    matches!(
        mime.as_str(),
        "text/html" | "application/xhtml+xml" | "text/plain"
    ) || mime.ends_with("+html")
}

/// Classification verdict for an observed document response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseVerdict {
    /// Proceed to text extraction
    Extractable,
    /// Anti-bot challenge or access denial
    Blocked,
    /// Not an HTML-derived document
    NonText,
}

/// Classify the main document response plus rendered body text
///
/// `response` is `None` when the CDP response event could not be observed;
/// classification then falls back to body markers alone.
#[must_use]
pub fn classify_response(
    response: Option<&PageResponse>,
    body_text: &str,
    markers: &[String],
) -> ResponseVerdict {
    if let Some(response) = response {
        if is_blocked_status(response.status) {
            return ResponseVerdict::Blocked;
        }
        if !response.mime_type.is_empty() && !is_text_document(&response.mime_type) {
            return ResponseVerdict::NonText;
        }
    }
    if body_matches_markers(body_text, markers) {
        return ResponseVerdict::Blocked;
    }
    ResponseVerdict::Extractable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::default_blocked_markers;

    fn response(status: i64, mime: &str) -> PageResponse {
        PageResponse {
            status,
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn forbidden_and_rate_limited_statuses_are_blocked() {
        assert!(is_blocked_status(403));
        assert!(is_blocked_status(429));
        assert!(!is_blocked_status(200));
        assert!(!is_blocked_status(404));
    }

    #[test]
    fn challenge_markers_match_case_insensitively() {
        let markers = default_blocked_markers();
        assert!(body_matches_markers(
            "Our systems have detected Unusual Traffic from your network",
            &markers
        ));
        assert!(!body_matches_markers("an ordinary article", &markers));
    }

    #[test]
    fn mime_classification_accepts_html_derivatives() {
        assert!(is_text_document("text/html"));
        assert!(is_text_document("text/html; charset=utf-8"));
        assert!(is_text_document("application/xhtml+xml"));
        assert!(!is_text_document("application/pdf"));
        assert!(!is_text_document("image/png"));
        assert!(!is_text_document("application/json"));
    }

    #[test]
    fn status_verdict_outranks_body_markers() {
        let verdict = classify_response(Some(&response(403, "text/html")), "hello", &[]);
        assert_eq!(verdict, ResponseVerdict::Blocked);
    }

    #[test]
    fn missing_response_event_falls_back_to_markers() {
        let markers = default_blocked_markers();
        assert_eq!(
            classify_response(None, "please solve this captcha", &markers),
            ResponseVerdict::Blocked
        );
        assert_eq!(
            classify_response(None, "regular page body", &markers),
            ResponseVerdict::Extractable
        );
    }
}
