//! Final URL normalization

use url::Url;

/// Collapse runs of `/` in a path into one.
pub(crate) fn collapse_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for ch in path.chars() {
        if ch == '/' && prev_slash {
            continue;
        }
        prev_slash = ch == '/';
        out.push(ch);
    }
    out
}

/// Collapse repeated slashes and clear an empty query. Returns `true` if
/// the URL changed.
///
/// Host case and default ports are already normalized: `Url` lowercases
/// hosts and drops the default port of special schemes while parsing.
pub fn normalize(url: &mut Url) -> bool {
    let before = url.as_str().to_string();

    if url.path().contains("//") {
        let path = collapse_slashes(url.path());
        url.set_path(&path);
    }

    if url.query() == Some("") {
        url.set_query(None);
    }

    url.as_str() != before
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(url: &str) -> (String, bool) {
        let mut url = Url::parse(url).unwrap();
        let changed = normalize(&mut url);
        (url.into(), changed)
    }

    #[test]
    fn test_collapse_slashes() {
        assert_eq!(collapse_slashes("//a///b/"), "/a/b/");
        assert_eq!(norm("https://example.com//a//b"), ("https://example.com/a/b".to_string(), true));
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(norm("https://example.com/a?"), ("https://example.com/a".to_string(), true));
        assert_eq!(norm("https://example.com/a?#x"), ("https://example.com/a#x".to_string(), true));
    }

    #[test]
    fn test_parsed_host_and_port_need_no_work() {
        assert_eq!(norm("HTTPS://Example.COM:443/"), ("https://example.com/".to_string(), false));
        assert_eq!(norm("http://example.com:8080/"), ("http://example.com:8080/".to_string(), false));
    }

    #[test]
    fn test_clean_url_unchanged() {
        assert_eq!(norm("https://example.com/a/ref=cstm"), ("https://example.com/a/ref=cstm".to_string(), false));
    }
}
