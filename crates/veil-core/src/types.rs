//! Core type definitions for Veil
//!
//! Pattern-store entries, blocking decisions and cleaning reports shared by
//! the blocker, the cleaner and the bindings.

use serde::{Deserialize, Serialize};

// =============================================================================
// Path Rules
// =============================================================================

/// A host pattern with an optional path-prefix condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct PathRule {
    /// Host pattern; an empty host makes the rule inert.
    #[serde(default)]
    pub host: String,
    /// Path prefix, normalized to start with `/` before comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_starts_with: Option<String>,
}

impl PathRule {
    /// Rule matching a host on any path.
    pub fn host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path_starts_with: None,
        }
    }

    /// Rule matching a host under a path prefix.
    pub fn with_path(host: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path_starts_with: Some(prefix.into()),
        }
    }

    /// The path prefix forced to begin with `/`, if the rule has one.
    pub fn normalized_prefix(&self) -> Option<String> {
        self.path_starts_with.as_deref().map(|prefix| {
            if prefix.starts_with('/') {
                prefix.to_string()
            } else {
                format!("/{prefix}")
            }
        })
    }
}

// =============================================================================
// Allowed Schemes
// =============================================================================

/// Scheme prefixes that are never subject to blocking.
pub const ALLOWED_SCHEMES: &[&str] = &[
    "data:",
    "blob:",
    "about:",
    "chrome-extension:",
    "moz-extension:",
    "safari-web-extension:",
    "ms-browser-extension:",
];

/// Check a raw URL string against the allowed scheme prefixes.
#[inline]
pub fn has_allowed_scheme(url: &str) -> bool {
    has_scheme_prefix(url, ALLOWED_SCHEMES)
}

/// ASCII case-insensitive prefix check over a set of scheme prefixes.
pub fn has_scheme_prefix(url: &str, schemes: &[&str]) -> bool {
    let bytes = url.trim_start().as_bytes();
    schemes.iter().any(|scheme| {
        bytes.len() >= scheme.len() && bytes[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
    })
}

// =============================================================================
// Match Result
// =============================================================================

/// Final decision for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// Request is allowed
    Allow,
    /// Request is blocked
    Block,
}

/// Which step of the predicate produced the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    /// Null or empty input
    Empty,
    /// Internal or opaque scheme (`data:`, `blob:`, ...)
    AllowedScheme,
    /// Input could not be parsed as a URL
    Unparsable,
    /// Parsed URL carries no hostname
    NoHost,
    /// Allowed host pattern matched
    AllowedHost,
    /// Allowed path rule matched
    AllowedRule,
    /// Same-origin request with same-origin allowance enabled
    SameOrigin,
    /// Blocked host pattern matched
    BlockedHost,
    /// Blocked path rule matched
    BlockedRule,
    /// Nothing matched
    NoMatch,
}

/// Result of matching a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub decision: MatchDecision,
    pub reason: DecisionReason,
}

impl MatchResult {
    pub fn allow(reason: DecisionReason) -> Self {
        Self {
            decision: MatchDecision::Allow,
            reason,
        }
    }

    pub fn block(reason: DecisionReason) -> Self {
        Self {
            decision: MatchDecision::Block,
            reason,
        }
    }

    #[inline]
    pub fn is_block(&self) -> bool {
        self.decision == MatchDecision::Block
    }
}

// =============================================================================
// Cleaning Steps
// =============================================================================

bitflags::bitflags! {
    /// Pipeline stages that changed a URL during cleaning.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CleanSteps: u8 {
        /// `javascript:` input replaced by the inert placeholder
        const NEUTRALIZED = 1 << 0;
        /// Redirector wrapper removed
        const UNWRAPPED = 1 << 1;
        /// Tracking or noise parameters removed
        const STRIPPED = 1 << 2;
        /// Vendor-specific canonicalization applied
        const CANONICALIZED = 1 << 3;
        /// Port, slash or empty-query normalization applied
        const NORMALIZED = 1 << 4;
        /// Marketplace `/ref=` path segments removed
        const REF_STRIPPED = 1 << 5;
        /// Input returned as-is (opaque scheme, unparsable, sensitive path)
        const UNTOUCHED = 1 << 6;
    }
}

/// Output of the cleaner together with the stages that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    pub href: String,
    pub steps: CleanSteps,
}

impl Cleaned {
    pub fn untouched(input: &str) -> Self {
        Self {
            href: input.to_string(),
            steps: CleanSteps::UNTOUCHED,
        }
    }
}
