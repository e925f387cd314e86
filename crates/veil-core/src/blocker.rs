//! Blocking predicate
//!
//! Every intercepted request, created node and navigable URL goes through
//! here. The order of checks is fixed: allowed schemes, allow patterns,
//! same-origin allowance, block patterns.

use url::Url;

use crate::config::{BlockerConfig, PageContext};
use crate::host::{hostname_matches, same_host};
use crate::rules::url_matches;
use crate::store::PatternHandle;
use crate::types::{has_allowed_scheme, DecisionReason, MatchResult};

/// Decides whether a URL belongs to a tracker.
#[derive(Debug, Clone)]
pub struct Blocker {
    patterns: PatternHandle,
    config: BlockerConfig,
    page: PageContext,
}

impl Blocker {
    /// Create a blocker reading from the given pattern handle.
    pub fn new(patterns: PatternHandle, config: BlockerConfig, page: PageContext) -> Self {
        Self {
            patterns,
            config,
            page,
        }
    }

    pub fn patterns(&self) -> &PatternHandle {
        &self.patterns
    }

    pub fn config(&self) -> BlockerConfig {
        self.config
    }

    pub fn set_config(&mut self, config: BlockerConfig) {
        self.config = config;
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    /// Point the blocker at a new page, e.g. after a same-document navigation.
    pub fn set_page(&mut self, page: PageContext) {
        self.page = page;
    }

    /// `true` when the URL should be blocked.
    pub fn should_block(&self, url: Option<&str>) -> bool {
        self.match_url(url).is_block()
    }

    /// Classify a URL and report which check decided it.
    pub fn match_url(&self, url: Option<&str>) -> MatchResult {
        let raw = match url {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return MatchResult::allow(DecisionReason::Empty),
        };

        if has_allowed_scheme(raw) {
            return MatchResult::allow(DecisionReason::AllowedScheme);
        }

        let parsed = match Url::options()
            .base_url(self.page.location.as_ref())
            .parse(raw)
        {
            Ok(parsed) => parsed,
            Err(err) => {
                log::trace!("unparsable url {raw:?}: {err}");
                return if self.config.fail_closed {
                    MatchResult::block(DecisionReason::Unparsable)
                } else {
                    MatchResult::allow(DecisionReason::Unparsable)
                };
            }
        };

        let result = self.match_parsed(&parsed);
        if result.is_block() {
            log::debug!("blocked {} ({:?})", parsed, result.reason);
        }
        result
    }

    /// Host-based checks on an already parsed URL.
    pub fn match_parsed(&self, url: &Url) -> MatchResult {
        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host,
            _ => return MatchResult::allow(DecisionReason::NoHost),
        };

        let store = self.patterns.read();

        if hostname_matches(host, &store.allowed_hosts) {
            return MatchResult::allow(DecisionReason::AllowedHost);
        }
        if url_matches(url, &store.allowed_rules) {
            return MatchResult::allow(DecisionReason::AllowedRule);
        }

        if self.config.allow_same_origin {
            if let Some(page_host) = self.page.hostname() {
                if same_host(host, &page_host) {
                    return MatchResult::allow(DecisionReason::SameOrigin);
                }
            }
        }

        if hostname_matches(host, &store.blocked_hosts) {
            return MatchResult::block(DecisionReason::BlockedHost);
        }
        if url_matches(url, &store.blocked_rules) {
            return MatchResult::block(DecisionReason::BlockedRule);
        }

        MatchResult::allow(DecisionReason::NoMatch)
    }
}
