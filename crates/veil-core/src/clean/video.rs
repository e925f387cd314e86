//! Video platform (YouTube family) canonicalization
//!
//! Short links, shorts, embeds and live pages all become
//! `https://www.youtube.com/watch?v=<id>` with the timestamp and playlist
//! position carried over.

use url::Url;

use crate::host::{hostname_matches, normalize_host};
use crate::query::{fragment_params, QueryParams};

/// Video platform domains, matched on label boundaries.
pub const VIDEO_DOMAINS: &[&str] = &["youtube.com", "youtube-nocookie.com", "youtu.be"];

/// Subdomains that are separate products with their own URL shapes.
const OTHER_PRODUCTS: &[&str] = &["music.", "studio.", "tv.", "accounts."];

const SHORT_LINK_HOSTS: &[&str] = &["youtu.be", "www.youtu.be"];

pub const CANONICAL_HOST: &str = "www.youtube.com";

/// Parameters kept on the watch page.
pub const WATCH_PARAMS: &[&str] = &["v", "t", "start", "list", "index"];

/// Share and attribution parameters deleted on every video page.
const SHARE_PARAMS: &[&str] = &["si", "pp", "feature", "ab_channel", "start_radio"];

/// Path forms that carry the video id as the second segment.
const ID_PATH_PREFIXES: &[&str] = &["shorts", "embed", "live", "v"];

pub fn is_video_host(host: &str) -> bool {
    let host = normalize_host(host);
    hostname_matches(&host, VIDEO_DOMAINS)
        && !OTHER_PRODUCTS.iter().any(|prefix| host.starts_with(prefix))
}

fn is_video_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Short-link paths that name a page rather than a video.
const SHORT_LINK_PAGES: &[&str] = &["watch", "playlist"];

/// Video id carried in the path of a short, embed, live or short-link URL.
fn path_video_id(url: &Url) -> Option<String> {
    let host = normalize_host(url.host_str()?);
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let first = segments.next()?;
    let id = if ID_PATH_PREFIXES.contains(&first) {
        segments.next()?
    } else if SHORT_LINK_HOSTS.contains(&host.as_str()) && !SHORT_LINK_PAGES.contains(&first) {
        first
    } else {
        return None;
    };

    is_video_id(id).then(|| id.to_string())
}

fn is_playlist_embed(url: &Url) -> bool {
    url.path().eq_ignore_ascii_case("/embed/videoseries")
}

fn move_to_canonical_host(url: &mut Url) {
    if url.host_str() == Some(CANONICAL_HOST) {
        return;
    }
    if let Err(err) = url.set_host(Some(CANONICAL_HOST)) {
        log::warn!("failed to rewrite video host of {}: {}", url, err);
    }
}

/// Build the watch-page query for a converted URL.
///
/// Timestamp precedence: query `t`, then fragment `t`, then `start`.
fn watch_query(id: &str, query: &QueryParams, fragment: &QueryParams) -> QueryParams {
    let mut params = QueryParams::default();
    params.push("v", id);

    let timestamp = query
        .get_non_empty("t")
        .or_else(|| fragment.get_non_empty("t"))
        .or_else(|| query.get_non_empty("start"));
    if let Some(timestamp) = timestamp {
        params.push("t", timestamp);
    }

    for name in ["list", "index"] {
        if let Some(value) = query.get_non_empty(name) {
            params.push(name, value);
        }
    }
    params
}

/// Rewrite a video-platform URL. Returns `true` if it changed.
pub fn canonicalize(url: &mut Url) -> bool {
    let before = url.as_str().to_string();
    let query = QueryParams::from_url(url);

    if is_playlist_embed(url) {
        if let Some(list) = query.get_non_empty("list") {
            let mut params = QueryParams::default();
            params.push("list", list);
            move_to_canonical_host(url);
            url.set_path("/playlist");
            params.apply_to(url);
            url.set_fragment(None);
        }
        return url.as_str() != before;
    }

    if let Some(id) = path_video_id(url) {
        let params = watch_query(&id, &query, &fragment_params(url));
        move_to_canonical_host(url);
        url.set_path("/watch");
        params.apply_to(url);
        url.set_fragment(None);
    } else {
        move_to_canonical_host(url);
    }

    let mut params = QueryParams::from_url(url);
    let removed = if url.path() == "/watch" {
        params.retain(|param| WATCH_PARAMS.contains(&param.key().as_str()))
    } else {
        params.retain(|param| !SHARE_PARAMS.contains(&param.key().as_str()))
    };
    if removed > 0 {
        params.apply_to(url);
    }

    url.as_str() != before
}
