use std::collections::HashSet;

use veil_core::{HostPattern, PathRule, PatternStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
    pub inert: usize,
}

/// Deduplicate a store and drop patterns that can never match.
///
/// Comparison uses the normalized pattern, so `Example.COM.` and
/// `example.com` count as one entry. The first occurrence keeps its
/// position and is rewritten to normal form.
pub fn optimize_store(store: &mut PatternStore) -> OptimizeStats {
    let before = store.len();
    let mut stats = OptimizeStats {
        before,
        ..OptimizeStats::default()
    };

    optimize_hosts(&mut store.blocked_hosts, &mut stats);
    optimize_hosts(&mut store.allowed_hosts, &mut stats);
    optimize_rules(&mut store.blocked_rules, &mut stats);
    optimize_rules(&mut store.allowed_rules, &mut stats);

    stats.after = store.len();
    stats
}

fn optimize_hosts(hosts: &mut Vec<String>, stats: &mut OptimizeStats) {
    let mut seen: HashSet<HostPattern> = HashSet::new();
    let mut kept = Vec::with_capacity(hosts.len());

    for raw in hosts.drain(..) {
        let Some(pattern) = HostPattern::parse(&raw) else {
            log::debug!("dropping inert host pattern {:?}", raw);
            stats.inert += 1;
            continue;
        };
        if seen.insert(pattern.clone()) {
            kept.push(pattern.to_string());
        } else {
            stats.deduped += 1;
        }
    }

    *hosts = kept;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RuleKey {
    host: HostPattern,
    prefix: Option<String>,
}

fn optimize_rules(rules: &mut Vec<PathRule>, stats: &mut OptimizeStats) {
    let mut seen: HashSet<RuleKey> = HashSet::new();
    let mut kept = Vec::with_capacity(rules.len());

    for rule in rules.drain(..) {
        let Some(host) = HostPattern::parse(&rule.host) else {
            log::debug!("dropping inert rule for host {:?}", rule.host);
            stats.inert += 1;
            continue;
        };
        let key = RuleKey {
            host,
            prefix: rule.normalized_prefix(),
        };
        if seen.contains(&key) {
            stats.deduped += 1;
            continue;
        }
        kept.push(PathRule {
            host: key.host.to_string(),
            path_starts_with: key.prefix.clone(),
        });
        seen.insert(key);
    }

    *rules = kept;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_and_inert() {
        let mut store = PatternStore {
            blocked_hosts: vec![
                "tracker.example".into(),
                "Tracker.Example.".into(),
                "".into(),
                "*".into(),
                "*.ads.example".into(),
                "ads.example".into(),
            ],
            blocked_rules: vec![
                PathRule::with_path("cdn.example", "collect"),
                PathRule::with_path("CDN.example", "/collect"),
                PathRule::host("cdn.example"),
                PathRule::host("a..b"),
            ],
            ..PatternStore::default()
        };

        let stats = optimize_store(&mut store);
        assert_eq!(store.blocked_hosts, vec!["tracker.example", "*.ads.example", "ads.example"]);
        assert_eq!(
            store.blocked_rules,
            vec![PathRule::with_path("cdn.example", "/collect"), PathRule::host("cdn.example")]
        );
        assert_eq!(stats.before, 10);
        assert_eq!(stats.after, 5);
        assert_eq!(stats.deduped, 2);
        assert_eq!(stats.inert, 3);
    }

    #[test]
    fn test_optimize_is_stable() {
        let mut store = PatternStore {
            allowed_hosts: vec!["good.example".into()],
            ..PatternStore::default()
        };
        let stats = optimize_store(&mut store);
        assert_eq!(stats.deduped + stats.inert, 0);
        assert_eq!(store.allowed_hosts, vec!["good.example"]);
    }
}
