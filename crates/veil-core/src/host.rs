//! Hostname matching with label-boundary suffix semantics
//!
//! Patterns come in three shapes: exact hosts (`example.com`), wildcards
//! (`*.example.com`) and multi-label suffixes (`co.uk`). Exact and suffix
//! patterns share one code path: a pattern matches its own host and every
//! host that ends with it on a label boundary.
//!
//! # Examples
//!
//! ```
//! use veil_core::host::hostname_matches;
//!
//! assert!(hostname_matches("sub.ample.com", &["ample.com"]));
//! assert!(!hostname_matches("example.com", &["ample.com"]));
//! assert!(hostname_matches("example.com", &["*.example.com"]));
//! ```

// =============================================================================
// Normalization
// =============================================================================

/// Lowercase a hostname and strip one trailing dot.
#[inline]
pub fn normalize_host(host: &str) -> String {
    let lower = host.to_ascii_lowercase();
    match lower.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => lower,
    }
}

/// Compare two hostnames after normalization.
pub fn same_host(a: &str, b: &str) -> bool {
    normalize_host(a) == normalize_host(b)
}

// =============================================================================
// Host Patterns
// =============================================================================

/// A validated hostname pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostPattern {
    /// Matches the host itself and any label-boundary subdomain.
    Suffix(String),
    /// `*.base`: matches `base` and any of its subdomains.
    Wildcard(String),
}

impl HostPattern {
    /// Parse a raw pattern string.
    ///
    /// Returns `None` for inert shapes: empty strings, a bare `*`, any `*`
    /// other than a single leading `*.`, leading dots and empty labels.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_host(raw.trim());
        if normalized.is_empty() || normalized == "*" {
            return None;
        }

        if let Some(base) = normalized.strip_prefix("*.") {
            if !is_well_formed(base) {
                return None;
            }
            return Some(Self::Wildcard(base.to_string()));
        }

        if !is_well_formed(&normalized) {
            return None;
        }

        Some(Self::Suffix(normalized))
    }

    /// The host part of the pattern, without any wildcard prefix.
    pub fn base(&self) -> &str {
        match self {
            Self::Suffix(base) | Self::Wildcard(base) => base,
        }
    }

    /// Check a normalized candidate host against this pattern.
    ///
    /// Both shapes accept the base itself; the wildcard form matching the
    /// apex domain is intentional.
    #[inline]
    pub fn matches(&self, host: &str) -> bool {
        let base = self.base();
        host == base || label_suffix_match(host, base)
    }
}

impl std::fmt::Display for HostPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suffix(base) => f.write_str(base),
            Self::Wildcard(base) => write!(f, "*.{base}"),
        }
    }
}

/// A pattern body is usable when it has no wildcard and no empty labels.
fn is_well_formed(body: &str) -> bool {
    !body.is_empty() && !body.contains('*') && body.split('.').all(|label| !label.is_empty())
}

// =============================================================================
// Label Matching
// =============================================================================

/// Label-boundary suffix comparison.
///
/// The pattern needs at least two labels and no more labels than the host.
/// The host's trailing labels, joined back with `.`, must equal the pattern,
/// so `x.co` matches `sub.x.co` but never `ax.co`.
pub fn label_suffix_match(host: &str, pattern: &str) -> bool {
    let pattern_labels = pattern.split('.').count();
    if pattern_labels < 2 {
        return false;
    }

    let host_labels: Vec<&str> = host.split('.').collect();
    if pattern_labels > host_labels.len() {
        return false;
    }

    host_labels[host_labels.len() - pattern_labels..].join(".") == pattern
}

/// Check whether a hostname matches any of the given patterns.
///
/// Inert patterns are skipped. IP literals get no special treatment.
pub fn hostname_matches<S: AsRef<str>>(candidate: &str, patterns: &[S]) -> bool {
    let host = normalize_host(candidate);
    patterns
        .iter()
        .filter_map(|raw| HostPattern::parse(raw.as_ref()))
        .any(|pattern| pattern.matches(&host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Example.COM."), "example.com");
        assert_eq!(normalize_host("example.com"), "example.com");
        assert_eq!(normalize_host("example.com.."), "example.com.");
    }

    #[test]
    fn test_parse_shapes() {
        assert_eq!(HostPattern::parse(" Example.COM. "), Some(HostPattern::Suffix("example.com".into())));
        assert_eq!(HostPattern::parse("*.example.com"), Some(HostPattern::Wildcard("example.com".into())));
        assert_eq!(HostPattern::parse("co.uk"), Some(HostPattern::Suffix("co.uk".into())));
    }

    #[test]
    fn test_parse_inert_shapes() {
        for raw in ["", "   ", "*", ".", "*.", ".example.com", "a..b", "*.*.example.com", "**.example.com", "*..example.com", "ex*mple.com"] {
            assert_eq!(HostPattern::parse(raw), None, "{raw:?} should be inert");
        }
    }

    #[test]
    fn test_label_suffix_match() {
        assert!(label_suffix_match("sub.x.co", "x.co"));
        assert!(label_suffix_match("x.co", "x.co"));
        assert!(!label_suffix_match("ax.co", "x.co"));
        assert!(!label_suffix_match("tax.co", "x.co"));
        assert!(!label_suffix_match("example.com", "com"));
        assert!(!label_suffix_match("co", "x.co"));
    }

    #[test]
    fn test_suffix_safety() {
        let patterns = ["ample.com"];
        assert!(hostname_matches("ample.com", &patterns));
        assert!(hostname_matches("sub.ample.com", &patterns));
        assert!(!hostname_matches("example.com", &patterns));
        assert!(!hostname_matches("testample.com", &patterns));
    }

    #[test]
    fn test_wildcard_includes_apex() {
        let patterns = ["*.example.com"];
        assert!(hostname_matches("example.com", &patterns));
        assert!(hostname_matches("sub.example.com", &patterns));
        assert!(hostname_matches("a.b.example.com", &patterns));
        assert!(!hostname_matches("notexample.com", &patterns));
    }

    #[test]
    fn test_case_and_trailing_dot() {
        let patterns = ["Example.COM."];
        assert!(hostname_matches("example.com.", &patterns));
        assert!(hostname_matches("EXAMPLE.COM.", &patterns));
        assert!(hostname_matches("Sub.Example.CoM.", &patterns));
    }

    #[test]
    fn test_single_label_pattern_is_exact_only() {
        assert!(hostname_matches("localhost", &["localhost"]));
        assert!(!hostname_matches("example.com", &["com"]));
        assert!(!hostname_matches("example.com", &["*.com"]));
    }

    #[test]
    fn test_malformed_wildcards_never_match() {
        for pattern in ["*.*.example.com", "**.example.com", "*..example.com", "*"] {
            assert!(!hostname_matches("a.b.example.com", &[pattern]), "{pattern}");
            assert!(!hostname_matches("example.com", &[pattern]), "{pattern}");
        }
    }

    #[test]
    fn test_ip_literals() {
        assert!(!hostname_matches("[::1]", &["example.com"]));
        assert!(hostname_matches("10.0.0.1", &["10.0.0.1"]));
    }
}
