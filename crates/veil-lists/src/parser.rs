//! Line-oriented pattern list parser

use std::net::IpAddr;

use veil_core::{HostPattern, PathRule, PatternStore};

/// One entry of a pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    BlockHost(String),
    BlockRule(PathRule),
    AllowHost(String),
    AllowRule(PathRule),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub comments: usize,
    pub entries: usize,
    pub skipped: usize,
}

/// A parsed list: the compiled store plus line statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedList {
    pub store: PatternStore,
    pub stats: ParseStats,
}

pub fn parse_pattern_list(text: &str) -> ParsedList {
    let mut parsed = ParsedList::default();

    for (idx, raw_line) in text.lines().enumerate() {
        parsed.stats.lines += 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if is_comment_line(line) {
            parsed.stats.comments += 1;
            continue;
        }

        match parse_line(line) {
            Some(entry) => {
                parsed.stats.entries += 1;
                push_entry(&mut parsed.store, entry);
            }
            None => {
                log::debug!("skipping invalid pattern on line {}: {:?}", idx + 1, line);
                parsed.stats.skipped += 1;
            }
        }
    }

    parsed
}

fn push_entry(store: &mut PatternStore, entry: ListEntry) {
    match entry {
        ListEntry::BlockHost(host) => store.blocked_hosts.push(host),
        ListEntry::BlockRule(rule) => store.blocked_rules.push(rule),
        ListEntry::AllowHost(host) => store.allowed_hosts.push(host),
        ListEntry::AllowRule(rule) => store.allowed_rules.push(rule),
    }
}

/// Parse a single non-comment line.
pub fn parse_line(line: &str) -> Option<ListEntry> {
    let line = strip_inline_comment(line.trim());

    let (allow, body) = match line.strip_prefix("@@") {
        Some(rest) => (true, rest.trim_start()),
        None => (false, line),
    };

    if !allow {
        if let Some(host) = parse_hosts_file_domain(body) {
            return Some(ListEntry::BlockHost(host));
        }
    }

    let body = strip_host_anchor(body)?;
    let (host, path) = match body.find('/') {
        Some(pos) => (&body[..pos], Some(&body[pos..])),
        None => (body, None),
    };
    let host = normalize_pattern(host)?;

    let entry = match (allow, path) {
        (false, None) => ListEntry::BlockHost(host),
        (true, None) => ListEntry::AllowHost(host),
        (false, Some(path)) => ListEntry::BlockRule(PathRule::with_path(host, path)),
        (true, Some(path)) => ListEntry::AllowRule(PathRule::with_path(host, path)),
    };
    Some(entry)
}

fn is_comment_line(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('[') || line.starts_with('#')
}

/// Hosts files carry trailing `# comment` text.
fn strip_inline_comment(line: &str) -> &str {
    match line.find(" #") {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

/// Accept the `||host^` anchor form used by adblock-style lists.
fn strip_host_anchor(body: &str) -> Option<&str> {
    let body = body.trim();
    let body = body.strip_prefix("||").unwrap_or(body);
    let body = body.strip_suffix('^').unwrap_or(body);
    if body.is_empty() || body.contains(char::is_whitespace) || body.contains(['^', '|', '$']) {
        return None;
    }
    Some(body)
}

/// `0.0.0.0 host` and `127.0.0.1 host`. Loopback names are not entries.
fn parse_hosts_file_domain(line: &str) -> Option<String> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let second = parts.next()?;

    if first.parse::<IpAddr>().is_err() {
        return None;
    }
    if matches!(second, "localhost" | "localhost.localdomain" | "local" | "broadcasthost") {
        return None;
    }
    normalize_pattern(second)
}

/// Normalize and validate a host pattern. Only hostname characters and a
/// leading `*.` are accepted.
fn normalize_pattern(host: &str) -> Option<String> {
    let pattern = HostPattern::parse(host)?;
    let valid_chars = pattern
        .base()
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_');
    valid_chars.then(|| pattern.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hosts_and_rules() {
        let text = "\
! Title: test list
[Adblock Plus 2.0]
# comment

tracker.example
Ads.Example.COM.
*.metrics.example
cdn.example/collect
||pixel.example^
@@good.example
@@cdn.example/lib
";
        let parsed = parse_pattern_list(text);
        assert_eq!(parsed.store.blocked_hosts, vec!["tracker.example", "ads.example.com", "*.metrics.example", "pixel.example"]);
        assert_eq!(parsed.store.blocked_rules, vec![PathRule::with_path("cdn.example", "/collect")]);
        assert_eq!(parsed.store.allowed_hosts, vec!["good.example"]);
        assert_eq!(parsed.store.allowed_rules, vec![PathRule::with_path("cdn.example", "/lib")]);
        assert_eq!(parsed.stats.comments, 3);
        assert_eq!(parsed.stats.entries, 7);
        assert_eq!(parsed.stats.skipped, 0);
    }

    #[test]
    fn test_hosts_file_lines() {
        let parsed = parse_pattern_list("0.0.0.0 ads.example # ad server\n127.0.0.1 localhost\n::1 beacon.example\n");
        assert_eq!(parsed.store.blocked_hosts, vec!["ads.example", "beacon.example"]);
        assert_eq!(parsed.stats.skipped, 1);
    }

    #[test]
    fn test_invalid_lines_skipped() {
        let parsed = parse_pattern_list("*\n.example.com\na..b\n*.*.example\nexample.com$third-party\nhost with space\nok.example\n");
        assert_eq!(parsed.store.blocked_hosts, vec!["ok.example"]);
        assert_eq!(parsed.stats.skipped, 6);
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("@@ allowed.example"), Some(ListEntry::AllowHost("allowed.example".into())));
        assert_eq!(parse_line("||ads.example/banner^"), Some(ListEntry::BlockRule(PathRule::with_path("ads.example", "/banner"))));
        assert_eq!(parse_line("@@0.0.0.0 ads.example"), None);
    }
}
