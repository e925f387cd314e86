//! Marketplace (Amazon family) canonicalization

use url::Url;

use super::normalize::collapse_slashes;
use super::path_under;
use crate::host::hostname_matches;
use crate::query::QueryParams;

/// Storefront domains, matched on label boundaries.
pub const MARKETPLACE_DOMAINS: &[&str] = &[
    "amazon.com", "amazon.ca", "amazon.com.mx", "amazon.com.br", "amazon.co.uk",
    "amazon.de", "amazon.fr", "amazon.it", "amazon.es", "amazon.nl", "amazon.se",
    "amazon.pl", "amazon.com.be", "amazon.com.tr", "amazon.ae", "amazon.sa",
    "amazon.eg", "amazon.in", "amazon.co.jp", "amazon.sg", "amazon.com.au",
];

/// Path prefixes of flows that must never be rewritten: sign-in, checkout,
/// cart, account and internal endpoints, sponsored-click redirects and
/// premium content.
const SENSITIVE_PREFIXES: &[&str] = &[
    "/ap", "/ax", "/checkout", "/cart", "/gp/buy", "/gp/cart", "/gp/checkout",
    "/gp/aws/cart", "/gp/aw/c", "/gp/css", "/gp/your-account", "/your-account",
    "/gp/signin", "/gp/sign-in", "/hz", "/sspa", "/gp/slredirect", "/gp/video",
    "/gp/digital", "/kindle-dbs", "/prime", "/gp/prime",
];

/// Search and browse parameters that carry user intent, lowercase.
pub const INTENT_PARAMS: &[&str] = &[
    "k", "keywords", "field-keywords", "rh", "node", "nodeid", "bbn", "i", "s", "page", "url",
];

pub fn is_marketplace_host(host: &str) -> bool {
    hostname_matches(host, MARKETPLACE_DOMAINS)
}

/// Does the path touch a flow that must be left alone? Repeated slashes
/// are collapsed first, the way normalization would.
pub fn is_sensitive_path(path: &str) -> bool {
    let path = collapse_slashes(path).to_ascii_lowercase();
    SENSITIVE_PREFIXES.iter().any(|prefix| path_under(&path, prefix))
}

/// An ASIN is ten ASCII alphanumerics.
fn is_asin(segment: &str) -> bool {
    segment.len() == 10 && segment.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Find the product identifier in a product-page path.
///
/// Recognizes `/dp/<id>`, `/gp/product/<id>`, `/gp/aw/d/<id>` and the
/// legacy `/exec/obidos/ASIN/<id>` shapes, with or without a slug prefix.
pub fn product_id(path: &str) -> Option<&str> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    segments.windows(2).enumerate().find_map(|(idx, pair)| {
        let marker = pair[0].to_ascii_lowercase();
        let is_marker = match marker.as_str() {
            "dp" | "product" | "asin" => true,
            "d" => idx > 0 && segments[idx - 1].eq_ignore_ascii_case("aw"),
            _ => false,
        };
        (is_marker && is_asin(pair[1])).then_some(pair[1])
    })
}

/// Rewrite a non-sensitive marketplace URL. Returns `true` if it changed.
///
/// Product pages collapse to `/dp/<id>` with no query or fragment; every
/// other page keeps only its intent parameters.
pub fn canonicalize(url: &mut Url) -> bool {
    let before = url.as_str().to_string();

    if let Some(asin) = product_id(url.path()).map(str::to_string) {
        url.set_path(&format!("/dp/{asin}"));
        url.set_query(None);
        url.set_fragment(None);
    } else {
        let mut params = QueryParams::from_url(url);
        if params.retain(|param| INTENT_PARAMS.contains(&param.key().as_str())) > 0 {
            params.apply_to(url);
        }
    }

    url.as_str() != before
}

/// Drop trailing `/ref=...` path segments. Returns `true` if the path changed.
pub fn strip_ref_segments(url: &mut Url) -> bool {
    let segments: Vec<&str> = url.path().split('/').collect();
    let cut = match segments
        .iter()
        .skip(1)
        .position(|segment| segment.to_ascii_lowercase().starts_with("ref="))
    {
        Some(pos) => pos + 1,
        None => return false,
    };

    let kept = segments[..cut].join("/");
    let path = if kept.is_empty() { "/".to_string() } else { kept };
    url.set_path(&path);
    true
}
