//! Engine configuration and page context

use serde::{Deserialize, Serialize};
use url::Url;

use crate::host::normalize_host;
use crate::store::PatternStore;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid page URL '{url}': {source}")]
    PageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// =============================================================================
// Engine Configuration
// =============================================================================

/// Top-level configuration, as stored by the settings UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineConfig {
    /// Never block requests to the page's own hostname.
    pub allow_same_origin: bool,
    /// Block inputs that cannot be parsed as URLs instead of letting them through.
    pub fail_closed: bool,
    /// Unwrap affiliate-network redirectors in addition to the built-in set.
    pub extended_redirectors: bool,
    pub patterns: PatternStore,
}

impl EngineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn blocker_config(&self) -> BlockerConfig {
        BlockerConfig {
            allow_same_origin: self.allow_same_origin,
            fail_closed: self.fail_closed,
        }
    }

    pub fn cleaner_config(&self) -> CleanerConfig {
        CleanerConfig {
            extended_redirectors: self.extended_redirectors,
        }
    }
}

/// Options for the blocking predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockerConfig {
    pub allow_same_origin: bool,
    pub fail_closed: bool,
}

/// Options for the URL cleaner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanerConfig {
    pub extended_redirectors: bool,
}

// =============================================================================
// Page Context
// =============================================================================

/// The page the engine is running in.
///
/// `location` is the document URL; `base_uri` is the document base URI,
/// which differs from the location when the page carries a `<base>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub location: Option<Url>,
    pub base_uri: Option<Url>,
}

impl PageContext {
    /// Context with no page, as in a detached worker.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Context for a document at `location`.
    pub fn from_location(location: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            location: Some(parse_page_url(location)?),
            base_uri: None,
        })
    }

    /// Set the document base URI.
    pub fn with_base_uri(mut self, base_uri: &str) -> Result<Self, ConfigError> {
        self.base_uri = Some(parse_page_url(base_uri)?);
        Ok(self)
    }

    /// Normalized hostname of the page, if it has one.
    pub fn hostname(&self) -> Option<String> {
        self.location
            .as_ref()
            .and_then(|url| url.host_str())
            .map(normalize_host)
    }

    /// Base for resolving relative hrefs: the base URI, else the location.
    pub fn href_base(&self) -> Option<&Url> {
        self.base_uri.as_ref().or(self.location.as_ref())
    }
}

fn parse_page_url(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url).map_err(|source| ConfigError::PageUrl {
        url: url.to_string(),
        source,
    })
}
