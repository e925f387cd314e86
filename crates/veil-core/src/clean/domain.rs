//! Per-vendor cleaning rules keyed by hostname

use url::Url;

use super::attribution::{platform_for_host, AttributionPlatform};
use super::{auction, marketplace, video};

/// The vendor rule that owns a host. Each rule carries its own list of
/// intent parameters that survive the global strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainRule {
    Video,
    Marketplace,
    Auction,
    Attribution(&'static AttributionPlatform),
}

impl DomainRule {
    /// Look up the rule for a host. At most one rule applies.
    pub fn for_host(host: &str) -> Option<Self> {
        if video::is_video_host(host) {
            Some(Self::Video)
        } else if marketplace::is_marketplace_host(host) {
            Some(Self::Marketplace)
        } else if auction::is_auction_host(host) {
            Some(Self::Auction)
        } else {
            platform_for_host(host).map(Self::Attribution)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Marketplace => "marketplace",
            Self::Auction => "auction",
            Self::Attribution(platform) => platform.name,
        }
    }

    /// Does this rule keep a (lowercased) parameter the global strip would remove?
    pub fn retains(&self, key: &str) -> bool {
        match self {
            Self::Video => video::WATCH_PARAMS.contains(&key),
            Self::Marketplace => marketplace::INTENT_PARAMS.contains(&key),
            Self::Auction => auction::KEEP_PARAMS.contains(&key),
            Self::Attribution(_) => false,
        }
    }

    /// Sensitive URLs are returned without any rewriting.
    pub fn is_sensitive(&self, url: &Url) -> bool {
        match self {
            Self::Marketplace => marketplace::is_sensitive_path(url.path()),
            Self::Auction => auction::is_sensitive(url),
            Self::Video | Self::Attribution(_) => false,
        }
    }

    /// Apply the vendor rewrite. Returns `true` if the URL changed.
    pub fn apply(&self, url: &mut Url) -> bool {
        match self {
            Self::Video => video::canonicalize(url),
            Self::Marketplace => marketplace::canonicalize(url),
            Self::Auction => auction::canonicalize(url),
            Self::Attribution(platform) => platform.strip(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_host() {
        assert_eq!(DomainRule::for_host("youtu.be"), Some(DomainRule::Video));
        assert_eq!(DomainRule::for_host("www.amazon.co.jp"), Some(DomainRule::Marketplace));
        assert_eq!(DomainRule::for_host("www.ebay.com"), Some(DomainRule::Auction));
        assert_eq!(DomainRule::for_host("go.onelink.me").map(|r| r.name()), Some("appsflyer"));
        assert_eq!(DomainRule::for_host("example.com"), None);
    }

    #[test]
    fn test_retains() {
        assert!(DomainRule::Auction.retains("_trksid"));
        assert!(!DomainRule::Marketplace.retains("_trksid"));
        assert!(DomainRule::Video.retains("t"));
    }

    #[test]
    fn test_sensitive() {
        let url = Url::parse("https://www.amazon.com/gp/cart/view.html?ref_=nav_cart").unwrap();
        assert!(DomainRule::Marketplace.is_sensitive(&url));
        assert!(!DomainRule::Video.is_sensitive(&url));
    }
}
