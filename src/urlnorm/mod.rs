//! Candidate-link normalization
//!
//! Every URL entering the link store passes through [`normalize_candidate`]
//! so that dedup operates on a canonical form: tracking decoration stripped,
//! fragments dropped, scheme/host lowercased, relative paths resolved, and
//! search-engine redirect wrappers unwrapped.

use url::Url;

/// Query parameters that carry tracking/click decoration, never content
///
/// The `utm_` family is matched by prefix; the rest are exact names. Google
/// result anchors in particular decorate outbound links with `ved`/`ei`/
/// `usg` click metadata that would otherwise defeat cross-run dedup.
const TRACKING_PARAMS: &[&str] = &["gclid", "fbclid", "ref", "ved", "ei", "sa", "usg"];

/// Hosts whose links are search-engine chrome, not results
const SELF_LINK_HOSTS: &[&str] = &["google.com", "duckduckgo.com", "bing.com"];

fn is_tracking_param(name: &str) -> bool {
    name.starts_with("utm_") || TRACKING_PARAMS.contains(&name)
}

/// Unwrap a `/url?q=<target>` redirect href into its target URL
///
/// Search result pages frequently route outbound clicks through a redirect
/// endpoint; the real destination rides in the `q` parameter. Returns `None`
/// when the href is not a redirect wrapper.
fn unwrap_redirect(href: &str, base: &Url) -> Option<String> {
    if !href.starts_with("/url?") && !href.contains("/url?q=") {
        return None;
    }
    let absolute = base.join(href).ok()?;
    absolute
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
}

/// Whether a parsed URL points back into the search engine itself
fn is_self_link(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    SELF_LINK_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{h}")))
}

/// Normalize one candidate href discovered on a result page
///
/// `base` is the URL of the page the href was found on, used to resolve
/// relative paths and redirect wrappers.
///
/// Returns `None` for anything that should not enter the link store:
/// non-http(s) schemes, unparseable hrefs, and links back into the search
/// engine.
#[must_use]
pub fn normalize_candidate(href: &str, base: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // Redirect wrappers carry the real target in their query string
    let target = match unwrap_redirect(href, base) {
        Some(t) => t,
        None => href.to_string(),
    };

    let mut url = match Url::parse(&target) {
        Ok(u) => u,
        // Relative path: resolve against the page it was found on
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(&target).ok()?,
        Err(_) => return None,
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    if is_self_link(&url) {
        return None;
    }

    url.set_fragment(None);

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &kept {
            query.append_pair(k, v);
        }
        url.set_query(Some(&query.finish()));
    }

    // Url::parse already lowercases scheme and host; serialize the result
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.google.com/search?q=rust").unwrap()
    }

    #[test]
    fn strips_tracking_params_and_fragment() {
        let out = normalize_candidate(
            "https://Example.COM/post?id=7&utm_source=x&fbclid=abc#section",
            &base(),
        )
        .unwrap();
        assert_eq!(out, "https://example.com/post?id=7");
    }

    #[test]
    fn unwraps_redirect_href() {
        let out = normalize_candidate(
            "/url?q=https://blog.example/article&ved=2ahUKE&usg=AOvVaw",
            &base(),
        )
        .unwrap();
        assert_eq!(out, "https://blog.example/article");
    }

    #[test]
    fn rejects_self_links_and_non_http() {
        assert!(normalize_candidate("https://www.google.com/preferences", &base()).is_none());
        assert!(normalize_candidate("mailto:someone@example.com", &base()).is_none());
        assert!(normalize_candidate("javascript:void(0)", &base()).is_none());
    }

    #[test]
    fn resolves_relative_against_base() {
        let page = Url::parse("https://search.example/results?q=a").unwrap();
        let out = normalize_candidate("/local/path", &page).unwrap();
        assert_eq!(out, "https://search.example/local/path");
    }

    #[test]
    fn drops_query_entirely_when_only_tracking_remains() {
        let out = normalize_candidate("https://example.com/page?utm_campaign=x", &base()).unwrap();
        assert_eq!(out, "https://example.com/page");
    }
}
