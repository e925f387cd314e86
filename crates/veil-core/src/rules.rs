//! Structured (host, path-prefix) rule matching

use url::Url;

use crate::host::{normalize_host, HostPattern};
use crate::types::PathRule;

/// Check a single rule against a hostname and path.
pub fn rule_matches(rule: &PathRule, host: &str, path: &str) -> bool {
    if rule.host.trim().is_empty() {
        return false;
    }

    let pattern = match HostPattern::parse(&rule.host) {
        Some(pattern) => pattern,
        None => return false,
    };
    if !pattern.matches(&normalize_host(host)) {
        return false;
    }

    match rule.normalized_prefix() {
        Some(prefix) => path.starts_with(&prefix),
        None => true,
    }
}

/// Check whether a parsed URL matches any of the given rules.
///
/// URLs without a hostname never match.
pub fn url_matches(url: &Url, rules: &[PathRule]) -> bool {
    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return false,
    };
    let path = url.path();

    rules.iter().any(|rule| rule_matches(rule, host, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_host_only_rule() {
        let rules = vec![PathRule::host("tracker.com")];
        assert!(url_matches(&parse("https://tracker.com/anything"), &rules));
        assert!(url_matches(&parse("https://cdn.tracker.com/"), &rules));
        assert!(!url_matches(&parse("https://nottracker.com/"), &rules));
    }

    #[test]
    fn test_path_prefix_rule() {
        let rules = vec![PathRule::with_path("example.com", "/collect")];
        assert!(url_matches(&parse("https://example.com/collect?v=1"), &rules));
        assert!(url_matches(&parse("https://example.com/collector"), &rules));
        assert!(!url_matches(&parse("https://example.com/page"), &rules));
        assert!(!url_matches(&parse("https://other.com/collect"), &rules));
    }

    #[test]
    fn test_prefix_is_forced_to_start_with_slash() {
        let rules = vec![PathRule::with_path("example.com", "pixel")];
        assert!(url_matches(&parse("https://example.com/pixel.gif"), &rules));
    }

    #[test]
    fn test_empty_host_rule_is_skipped() {
        let rules = vec![PathRule::with_path("", "/collect"), PathRule::host("   ")];
        assert!(!url_matches(&parse("https://example.com/collect"), &rules));
    }

    #[test]
    fn test_url_without_host() {
        let rules = vec![PathRule::host("example.com")];
        assert!(!url_matches(&parse("mailto:someone@example.com"), &rules));
    }

    #[test]
    fn test_wildcard_rule() {
        let rules = vec![PathRule::with_path("*.analytics.io", "/v1/")];
        assert!(url_matches(&parse("https://eu.analytics.io/v1/track"), &rules));
        assert!(url_matches(&parse("https://analytics.io/v1/track"), &rules));
        assert!(!url_matches(&parse("https://eu.analytics.io/v2/track"), &rules));
    }
}
