//! URL cleaning pipeline
//!
//! Stages, in order:
//! 1. `javascript:` neutralization
//! 2. opaque schemes (`data:`, `blob:`, `about:`) pass through
//! 3. redirector unwrapping
//! 4. sensitive-path short circuit for the owning vendor rule
//! 5. global tracking-parameter strip
//! 6. vendor canonicalization
//! 7. normalization (host case and default ports come from parsing)
//! 8. marketplace `/ref=` segment removal
//!
//! Cleaning is idempotent: a cleaned URL cleans to itself.

pub mod attribution;
pub mod auction;
pub mod domain;
pub mod marketplace;
pub mod normalize;
pub mod params;
pub mod redirect;
pub mod video;

use url::Url;

use crate::config::{CleanerConfig, PageContext};
use crate::types::{has_scheme_prefix, CleanSteps, Cleaned};
use domain::DomainRule;

/// Replacement for neutralized `javascript:` hrefs.
pub const INERT_HREF: &str = "about:blank";

const OPAQUE_SCHEMES: &[&str] = &["data:", "blob:", "about:"];

/// Is `path` equal to `prefix` or below it on a segment boundary?
pub(crate) fn path_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Scheme check the way browsers read hrefs: leading C0 controls and spaces
/// are ignored, tabs and newlines anywhere are removed.
pub fn is_javascript_href(input: &str) -> bool {
    let stripped: String = input
        .trim_start_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .take("javascript:".len())
        .collect();
    stripped.eq_ignore_ascii_case("javascript:")
}

/// The cleaning pipeline bound to a page context.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanerConfig,
    page: PageContext,
}

impl Cleaner {
    pub fn new(config: CleanerConfig, page: PageContext) -> Self {
        Self { config, page }
    }

    pub fn config(&self) -> CleanerConfig {
        self.config
    }

    pub fn set_config(&mut self, config: CleanerConfig) {
        self.config = config;
    }

    pub fn page(&self) -> &PageContext {
        &self.page
    }

    pub fn set_page(&mut self, page: PageContext) {
        self.page = page;
    }

    /// Clean an href, returning only the rewritten string.
    pub fn clean_href(&self, input: &str, base: Option<&str>) -> String {
        self.clean(input, base).href
    }

    /// Clean an href, reporting which stages fired.
    ///
    /// `base` overrides the page's base URI for relative resolution; it is
    /// itself resolved against the page.
    pub fn clean(&self, input: &str, base: Option<&str>) -> Cleaned {
        if is_javascript_href(input) {
            log::debug!("neutralized javascript href");
            return Cleaned {
                href: INERT_HREF.to_string(),
                steps: CleanSteps::NEUTRALIZED,
            };
        }
        if input.trim().is_empty() || has_scheme_prefix(input, OPAQUE_SCHEMES) {
            return Cleaned::untouched(input);
        }

        let mut url = match self.resolve(input, base) {
            Some(url) => url,
            None => return Cleaned::untouched(input),
        };
        if !matches!(url.scheme(), "http" | "https") {
            return Cleaned::untouched(input);
        }

        let mut steps = CleanSteps::empty();

        if let Some(target) = redirect::unwrap(&url, self.config.extended_redirectors) {
            url = target;
            steps |= CleanSteps::UNWRAPPED;
        }

        let host = url.host_str().unwrap_or_default().to_string();
        let rule = DomainRule::for_host(&host);

        if let Some(rule) = rule.filter(|rule| rule.is_sensitive(&url)) {
            log::trace!("{} rule marks {} sensitive", rule.name(), url);
            return if steps.is_empty() {
                Cleaned::untouched(input)
            } else {
                Cleaned { href: url.into(), steps }
            };
        }

        let mut query = crate::query::QueryParams::from_url(&url);
        let removed = params::strip_tracking(&mut query, |key| rule.map_or(false, |rule| rule.retains(key)));
        if removed > 0 {
            query.apply_to(&mut url);
            steps |= CleanSteps::STRIPPED;
        }

        if let Some(rule) = rule {
            if rule.apply(&mut url) {
                steps |= CleanSteps::CANONICALIZED;
            }
        }

        if normalize::normalize(&mut url) {
            steps |= CleanSteps::NORMALIZED;
        }

        if marketplace::is_marketplace_host(&host) && marketplace::strip_ref_segments(&mut url) {
            steps |= CleanSteps::REF_STRIPPED;
        }

        // Parsing alone lowercases the host, drops default ports and
        // resolves relative input.
        if steps.is_empty() && url.as_str() != input.trim() {
            steps |= CleanSteps::NORMALIZED;
        }
        Cleaned { href: url.into(), steps }
    }

    /// Parse `input` against the explicit base, else the page.
    fn resolve(&self, input: &str, base: Option<&str>) -> Option<Url> {
        let page_base = self.page.href_base();
        let explicit = base.and_then(|base| Url::options().base_url(page_base).parse(base).ok());
        let base = explicit.as_ref().or(page_base);

        match Url::options().base_url(base).parse(input.trim()) {
            Ok(url) => Some(url),
            Err(err) => {
                log::trace!("leaving unparsable href {:?}: {}", input, err);
                None
            }
        }
    }
}
