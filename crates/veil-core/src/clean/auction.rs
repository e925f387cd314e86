//! Auction site (eBay family) canonicalization

use url::Url;

use super::normalize::collapse_slashes;
use super::path_under;
use crate::host::{hostname_matches, normalize_host};
use crate::query::QueryParams;

pub const AUCTION_DOMAINS: &[&str] = &[
    "ebay.com", "ebay.ca", "ebay.co.uk", "ebay.ie", "ebay.de", "ebay.at", "ebay.ch",
    "ebay.fr", "ebay.it", "ebay.es", "ebay.nl", "ebay.be", "ebay.pl", "ebay.com.au",
    "ebay.com.sg", "ebay.com.hk", "ebay.com.my", "ebay.ph",
];

/// Intent parameters, lowercase: search keywords, category, sort, price
/// bounds, paging, result type, listing identifiers and the tracking-session
/// values some listing pages need to render.
pub const KEEP_PARAMS: &[&str] = &[
    "_nkw", "_sacat", "_sop", "_udlo", "_udhi", "_pgn", "_ipg", "rt", "hash", "item",
    "epid", "var", "_trksid", "_from",
];

/// Fragment content that marks a campaign link.
const FRAGMENT_MARKERS: &[&str] = &["utm_", "mkcid", "mkevt", "mkrid", "campid", "_trkparms", "trk"];

const SENSITIVE_SUBDOMAINS: &[&str] = &["signin.", "pay.", "checkout.", "cart."];
const SENSITIVE_PATHS: &[&str] = &["/signin", "/checkout", "/ws"];

pub fn is_auction_host(host: &str) -> bool {
    hostname_matches(host, AUCTION_DOMAINS)
}

/// Sign-in, payment, checkout and cart flows are left alone.
pub fn is_sensitive(url: &Url) -> bool {
    let host = url.host_str().map(normalize_host).unwrap_or_default();
    if SENSITIVE_SUBDOMAINS.iter().any(|prefix| host.starts_with(prefix)) {
        return true;
    }
    let path = collapse_slashes(url.path()).to_ascii_lowercase();
    SENSITIVE_PATHS.iter().any(|prefix| path_under(&path, prefix))
}

/// Keep only intent parameters and drop marketing fragments. Returns `true`
/// if the URL changed.
pub fn canonicalize(url: &mut Url) -> bool {
    let mut changed = false;

    let mut params = QueryParams::from_url(url);
    if params.retain(|param| KEEP_PARAMS.contains(&param.key().as_str())) > 0 {
        params.apply_to(url);
        changed = true;
    }

    let marketing = url
        .fragment()
        .map(|fragment| {
            let fragment = fragment.to_ascii_lowercase();
            FRAGMENT_MARKERS.iter().any(|marker| fragment.contains(marker))
        })
        .unwrap_or(false);
    if marketing {
        url.set_fragment(None);
        changed = true;
    }

    changed
}
