//! Global tracking-parameter stripping

use crate::query::{QueryParam, QueryParams};

/// Parameter names removed from every URL, compared lowercased.
pub const GLOBAL_STRIP: &[&str] = &[
    // Ad click identifiers
    "fbclid", "gclid", "gclsrc", "dclid", "gbraid", "wbraid", "msclkid", "yclid",
    "ttclid", "twclid", "li_fat_id", "epik", "irclickid", "rb_clickid", "srsltid",
    // Analytics and email campaigns
    "_ga", "_gl", "_hsenc", "_hsmi", "__hssc", "__hstc", "__hsfp", "hsctatracking",
    "mc_cid", "mc_eid", "mkt_tok", "oly_anon_id", "oly_enc_id", "vero_conv",
    "vero_id", "wickedid", "s_cid", "_openstat", "cmpid", "ncid", "sr_share",
    "__twitter_impression", "igshid", "igsh", "spm", "scm",
    // Marketplace and auction-site campaign markers
    "mkcid", "mkevt", "mkrid", "campid", "customid", "toolid", "_trkparms",
    "_trksid", "trk", "trkcampaign",
];

/// Prefixes removed from every URL.
const GLOBAL_STRIP_PREFIXES: &[&str] = &["utm_"];

/// Attribution noise names and prefixes.
const NOISE_NAMES: &[&str] = &["ref", "_encoding", "content-id"];
const NOISE_PREFIXES: &[&str] = &["ref_", "pf_rd_", "pd_rd_"];

/// Is this a tracking or noise parameter?
pub fn is_tracking_param(param: &QueryParam) -> bool {
    let key = param.key();
    if param.value().is_empty() {
        return true;
    }
    GLOBAL_STRIP.contains(&key.as_str())
        || GLOBAL_STRIP_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
        || NOISE_NAMES.contains(&key.as_str())
        || NOISE_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
}

/// Strip tracking parameters unless `retains` explicitly keeps them.
///
/// Returns the number of parameters removed.
pub fn strip_tracking(params: &mut QueryParams, retains: impl Fn(&str) -> bool) -> usize {
    params.retain(|param| !is_tracking_param(param) || retains(&param.key()))
}
