//! Engine facade
//!
//! Bundles the blocking predicate and the cleaner around one shared pattern
//! store and page context. This is what interception adapters hold on to.

use crate::blocker::Blocker;
use crate::clean::Cleaner;
use crate::config::{EngineConfig, PageContext};
use crate::store::PatternHandle;
use crate::types::{Cleaned, MatchResult};

#[derive(Debug, Clone)]
pub struct Engine {
    blocker: Blocker,
    cleaner: Cleaner,
}

impl Engine {
    pub fn new(config: EngineConfig, page: PageContext) -> Self {
        let blocker_config = config.blocker_config();
        let cleaner_config = config.cleaner_config();
        let patterns = PatternHandle::new(config.patterns);
        Self {
            blocker: Blocker::new(patterns, blocker_config, page.clone()),
            cleaner: Cleaner::new(cleaner_config, page),
        }
    }

    /// Shared pattern store. Mutations are seen by subsequent decisions.
    pub fn patterns(&self) -> &PatternHandle {
        self.blocker.patterns()
    }

    pub fn page(&self) -> &PageContext {
        self.blocker.page()
    }

    pub fn set_page(&mut self, page: PageContext) {
        log::debug!("page context set to {:?}", page.location.as_ref().map(|url| url.as_str()));
        self.blocker.set_page(page.clone());
        self.cleaner.set_page(page);
    }

    pub fn should_block(&self, url: Option<&str>) -> bool {
        self.blocker.should_block(url)
    }

    pub fn match_url(&self, url: Option<&str>) -> MatchResult {
        self.blocker.match_url(url)
    }

    pub fn clean_href(&self, input: &str, base: Option<&str>) -> String {
        self.cleaner.clean_href(input, base)
    }

    pub fn clean(&self, input: &str, base: Option<&str>) -> Cleaned {
        self.cleaner.clean(input, base)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), PageContext::detached())
    }
}
