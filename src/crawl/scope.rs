// src/crawl/scope.rs
// =============================================================================
// Decides which URLs belong to the site being monitored.
//
// A candidate is "in scope" when:
// - its scheme is http or https
// - its host and explicit port match the seed exactly
//
// The url crate already lowercases the host and drops default ports while
// parsing, so comparing `host_str()` and `port()` is an exact authority match.
// =============================================================================

use url::Url;

// Returns true if `candidate` should be crawled as part of the `base` site.
//
// Examples (base = https://example.com/):
//   https://example.com/docs      -> true
//   http://example.com/docs       -> true  (same host, other allowed scheme)
//   https://blog.example.com/     -> false (no subdomain wildcarding)
//   https://example.com:8443/     -> false (different port)
//   mailto:someone@example.com    -> false
pub fn in_scope(candidate: &Url, base: &Url) -> bool {
    matches!(candidate.scheme(), "http" | "https")
        && candidate.host_str().is_some()
        && candidate.host_str() == base.host_str()
        && candidate.port() == base.port()
}

// Puts a URL into the form used for dedup: the fragment is dropped,
// everything else (including a trailing slash) is kept.
pub fn canonicalize(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_host_is_in_scope() {
        let base = url("https://example.com/");
        assert!(in_scope(&url("https://example.com/docs"), &base));
        assert!(in_scope(&url("http://example.com/docs"), &base));
    }

    #[test]
    fn test_subdomain_is_out_of_scope() {
        let base = url("https://example.com/");
        assert!(!in_scope(&url("https://blog.example.com/"), &base));
        assert!(!in_scope(&url("https://other.com/"), &base));
    }

    #[test]
    fn test_port_must_match() {
        let base = url("http://127.0.0.1:8080/");
        assert!(in_scope(&url("http://127.0.0.1:8080/a"), &base));
        assert!(!in_scope(&url("http://127.0.0.1:9090/a"), &base));

        // Default ports are normalised away by the parser
        let base = url("https://example.com/");
        assert!(in_scope(&url("https://example.com:443/a"), &base));
    }

    #[test]
    fn test_non_http_schemes_are_out_of_scope() {
        let base = url("https://example.com/");
        assert!(!in_scope(&url("mailto:someone@example.com"), &base));
        assert!(!in_scope(&url("ftp://example.com/file"), &base));
        assert!(!in_scope(&url("javascript:void(0)"), &base));
    }

    #[test]
    fn test_host_comparison_ignores_case() {
        let base = url("https://Example.COM/");
        assert!(in_scope(&url("https://example.com/about"), &base));
    }

    #[test]
    fn test_canonicalize_strips_fragment_only() {
        assert_eq!(
            canonicalize(url("https://example.com/a#top")).as_str(),
            "https://example.com/a"
        );
        assert_eq!(
            canonicalize(url("https://example.com/a/")).as_str(),
            "https://example.com/a/"
        );
    }
}
