//! Redirector unwrapping
//!
//! Link-wrapping services put the real destination in a query parameter.
//! Unwrapping repeats until no redirector matches, so a wrapper around a
//! wrapper cleans in one pass.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::host::{label_suffix_match, normalize_host};
use crate::query::QueryParams;

/// Nesting bound for wrapped redirectors.
const MAX_UNWRAP_DEPTH: usize = 8;

/// How a redirector rule recognizes its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMatch {
    /// Host contains the text anywhere (`google.` covers every ccTLD).
    Contains(&'static str),
    /// Host equals the domain or is a label-boundary subdomain of it.
    Domain(&'static str),
}

impl HostMatch {
    fn matches(&self, host: &str) -> bool {
        match *self {
            Self::Contains(text) => host.contains(text),
            Self::Domain(domain) => host == domain || label_suffix_match(host, domain),
        }
    }
}

/// A known link-wrapping service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectorRule {
    pub host: HostMatch,
    pub path_has: Option<&'static str>,
    /// Candidate target parameters, first present wins.
    pub params: &'static [&'static str],
}

impl RedirectorRule {
    const fn new(host: HostMatch, path_has: Option<&'static str>, params: &'static [&'static str]) -> Self {
        Self {
            host,
            path_has,
            params,
        }
    }

    /// Does this rule apply to the URL?
    pub fn applies_to(&self, url: &Url) -> bool {
        let host = match url.host_str() {
            Some(host) => normalize_host(host),
            None => return false,
        };
        if !self.host.matches(&host) {
            return false;
        }
        match self.path_has {
            Some(fragment) => url.path().contains(fragment),
            None => true,
        }
    }

    /// Extract and parse the wrapped destination.
    pub fn target(&self, url: &Url) -> Option<Url> {
        let params = QueryParams::from_url(url);
        let raw = self.params.iter().find_map(|name| params.get_non_empty(name))?;
        parse_target(raw)
    }
}

use HostMatch::{Contains, Domain};

/// Redirectors that are always unwrapped.
pub const BUILTIN_REDIRECTORS: &[RedirectorRule] = &[
    RedirectorRule::new(Domain("t.co"), None, &["url", "u"]),
    RedirectorRule::new(Contains("google."), Some("/url"), &["q", "url"]),
    RedirectorRule::new(Domain("l.facebook.com"), Some("/l.php"), &["u"]),
    RedirectorRule::new(Domain("lm.facebook.com"), Some("/l.php"), &["u"]),
    RedirectorRule::new(Domain("l.messenger.com"), Some("/l.php"), &["u"]),
    RedirectorRule::new(Domain("l.instagram.com"), None, &["u"]),
    RedirectorRule::new(Domain("out.reddit.com"), None, &["url"]),
    RedirectorRule::new(Domain("away.vk.com"), Some("/away.php"), &["to"]),
    RedirectorRule::new(Domain("vk.com"), Some("/away.php"), &["to"]),
    RedirectorRule::new(Domain("steamcommunity.com"), Some("/linkfilter"), &["url", "u"]),
    RedirectorRule::new(Domain("youtube.com"), Some("/redirect"), &["q"]),
    RedirectorRule::new(Domain("slack-redir.net"), Some("/link"), &["url"]),
];

/// Affiliate-network redirectors, unwrapped only when enabled.
pub const EXTENDED_REDIRECTORS: &[RedirectorRule] = &[
    RedirectorRule::new(Domain("anrdoezrs.net"), None, &["url"]),
    RedirectorRule::new(Domain("dpbolvw.net"), None, &["url"]),
    RedirectorRule::new(Domain("jdoqocy.com"), None, &["url"]),
    RedirectorRule::new(Domain("kqzyfj.com"), None, &["url"]),
    RedirectorRule::new(Domain("tkqlhce.com"), None, &["url"]),
    RedirectorRule::new(Domain("awin1.com"), Some("/cread.php"), &["ued"]),
    RedirectorRule::new(Domain("shareasale.com"), Some("/r.cfm"), &["urllink"]),
    RedirectorRule::new(Domain("click.linksynergy.com"), None, &["murl"]),
    RedirectorRule::new(Domain("go.skimresources.com"), None, &["url"]),
    RedirectorRule::new(Domain("disq.us"), None, &["url"]),
];

/// The active redirector list for a feature-flag setting.
pub fn redirectors(extended: bool) -> impl Iterator<Item = &'static RedirectorRule> {
    let extra: &'static [RedirectorRule] = if extended { EXTENDED_REDIRECTORS } else { &[] };
    BUILTIN_REDIRECTORS.iter().chain(extra.iter())
}

/// Parse a redirector target, retrying once after percent-decoding.
///
/// Only `http` and `https` destinations are accepted.
pub fn parse_target(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let parsed = Url::parse(raw).ok().or_else(|| {
        let decoded = percent_decode_str(raw).decode_utf8().ok()?;
        Url::parse(decoded.trim()).ok()
    })?;

    matches!(parsed.scheme(), "http" | "https").then_some(parsed)
}

/// Unwrap one redirector level. Rules whose target does not parse are skipped.
pub fn unwrap_once(url: &Url, extended: bool) -> Option<Url> {
    redirectors(extended)
        .filter(|rule| rule.applies_to(url))
        .find_map(|rule| rule.target(url))
}

/// Unwrap nested redirectors. Returns `None` when nothing was unwrapped.
///
/// A chain deeper than `MAX_UNWRAP_DEPTH` is left fully wrapped, so the
/// result never depends on how many times cleaning ran.
pub fn unwrap(url: &Url, extended: bool) -> Option<Url> {
    let mut current = url.clone();
    for depth in 0..MAX_UNWRAP_DEPTH {
        match unwrap_once(&current, extended) {
            Some(next) => {
                log::debug!("unwrapped redirector {} -> {}", current, next);
                current = next;
            }
            None => return (depth > 0).then_some(current),
        }
    }

    if unwrap_once(&current, extended).is_some() {
        log::debug!("redirector chain deeper than {} levels, leaving {} wrapped", MAX_UNWRAP_DEPTH, url);
        return None;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwrap_str(url: &str, extended: bool) -> Option<String> {
        unwrap(&Url::parse(url).unwrap(), extended).map(String::from)
    }

    #[test]
    fn test_tco() {
        assert_eq!(
            unwrap_str("https://t.co/?url=https%3A%2F%2Fdest.example%2Fpage", false).as_deref(),
            Some("https://dest.example/page")
        );
    }

    #[test]
    fn test_domain_match_is_label_aware() {
        assert_eq!(unwrap_str("https://microsoft.com/?url=https%3A%2F%2Fdest.example%2F", false), None);
    }

    #[test]
    fn test_google_url() {
        assert_eq!(
            unwrap_str("https://www.google.co.uk/url?sa=t&q=https://dest.example/a%3Fb%3D1&ved=x", false).as_deref(),
            Some("https://dest.example/a?b=1")
        );
        assert_eq!(unwrap_str("https://www.google.com/search?q=https://dest.example/", false), None);
    }

    #[test]
    fn test_facebook() {
        assert_eq!(
            unwrap_str("https://l.facebook.com/l.php?u=https%3A%2F%2Fdest.example%2F&h=AT0", false).as_deref(),
            Some("https://dest.example/")
        );
    }

    #[test]
    fn test_double_encoded_target() {
        assert_eq!(
            unwrap_str("https://out.reddit.com/t3_x?url=https%253A%252F%252Fdest.example%252Fp", false).as_deref(),
            Some("https://dest.example/p")
        );
    }

    #[test]
    fn test_unparsable_target_is_skipped() {
        assert_eq!(unwrap_str("https://t.co/?url=not-a-url", false), None);
        assert_eq!(unwrap_str("https://t.co/?url=javascript%3Aalert(1)", false), None);
        assert_eq!(unwrap_str("https://t.co/?url=", false), None);
    }

    #[test]
    fn test_nested() {
        let inner = "https%3A%2F%2Fl.facebook.com%2Fl.php%3Fu%3Dhttps%253A%252F%252Fdest.example%252F";
        assert_eq!(
            unwrap_str(&format!("https://t.co/?url={inner}"), false).as_deref(),
            Some("https://dest.example/")
        );
    }

    fn nested(depth: usize) -> String {
        let mut href = "https://dest.example/p".to_string();
        for _ in 0..depth {
            let encoded: String = url::form_urlencoded::byte_serialize(href.as_bytes()).collect();
            href = format!("https://t.co/?url={encoded}");
        }
        href
    }

    #[test]
    fn test_depth_bound() {
        assert_eq!(unwrap_str(&nested(8), false).as_deref(), Some("https://dest.example/p"));
        assert_eq!(unwrap_str(&nested(9), false), None);
    }

    #[test]
    fn test_extended_flag() {
        let url = "https://www.awin1.com/cread.php?awinmid=1&ued=https%3A%2F%2Fshop.example%2Fitem";
        assert_eq!(unwrap_str(url, false), None);
        assert_eq!(unwrap_str(url, true).as_deref(), Some("https://shop.example/item"));
    }
}
