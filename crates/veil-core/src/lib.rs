//! Veil Core Library
//!
//! Decision and rewriting engine for the Veil privacy shield. Interception
//! adapters (network hooks, DOM observers, navigation handlers) call into
//! this crate and act on its answers.
//!
//! # Architecture
//!
//! Two independent pipelines share the same hostname-matching primitives:
//!
//! - the blocking predicate classifies a URL as tracker or not using host
//!   patterns and host+path rules, with allow entries taking precedence;
//! - the cleaner rewrites hrefs by unwrapping redirectors, stripping tracking
//!   parameters and canonicalizing vendor URL shapes.
//!
//! # Modules
//!
//! - `host`: label-aware hostname and wildcard matching
//! - `rules`: host+path rule evaluation
//! - `store`: runtime-mutable pattern store
//! - `blocker`: the blocking predicate
//! - `query`: encoding-preserving query-string handling
//! - `clean`: the URL cleaning pipeline and vendor rules
//! - `config`: engine configuration and page context
//! - `engine`: facade combining blocker and cleaner
//! - `types`: shared type definitions

pub mod blocker;
pub mod clean;
pub mod config;
pub mod engine;
pub mod host;
pub mod query;
pub mod rules;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use blocker::Blocker;
pub use clean::Cleaner;
pub use config::{BlockerConfig, CleanerConfig, ConfigError, EngineConfig, PageContext};
pub use engine::Engine;
pub use host::{hostname_matches, normalize_host, HostPattern};
pub use rules::url_matches;
pub use store::{PatternHandle, PatternStore};
pub use types::{CleanSteps, Cleaned, DecisionReason, MatchDecision, MatchResult, PathRule};
