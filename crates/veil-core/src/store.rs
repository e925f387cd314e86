//! Pattern store shared between the blocker and its callers
//!
//! The store holds four ordered collections. Callers may append or remove
//! entries at runtime through a [`PatternHandle`]; the blocker reads the
//! current contents on every call and never caches them.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use serde::{Deserialize, Serialize};

use crate::types::PathRule;

// =============================================================================
// Pattern Store
// =============================================================================

/// Blocked and allowed host patterns and path rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PatternStore {
    pub blocked_hosts: Vec<String>,
    pub blocked_rules: Vec<PathRule>,
    pub allowed_hosts: Vec<String>,
    pub allowed_rules: Vec<PathRule>,
}

impl PatternStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all collections.
    pub fn len(&self) -> usize {
        self.blocked_hosts.len()
            + self.blocked_rules.len()
            + self.allowed_hosts.len()
            + self.allowed_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append another store's entries, keeping order.
    pub fn extend(&mut self, other: PatternStore) {
        self.blocked_hosts.extend(other.blocked_hosts);
        self.blocked_rules.extend(other.blocked_rules);
        self.allowed_hosts.extend(other.allowed_hosts);
        self.allowed_rules.extend(other.allowed_rules);
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Cloneable, thread-safe handle to a pattern store.
///
/// Every clone refers to the same underlying store. Use [`snapshot`] and
/// [`restore`] to isolate tests that mutate patterns.
///
/// [`snapshot`]: PatternHandle::snapshot
/// [`restore`]: PatternHandle::restore
#[derive(Debug, Clone, Default)]
pub struct PatternHandle {
    inner: Arc<RwLock<PatternStore>>,
}

impl PatternHandle {
    pub fn new(store: PatternStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Borrow the current contents for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, PatternStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the store in place.
    pub fn update<R>(&self, f: impl FnOnce(&mut PatternStore) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Replace the whole store, returning the previous contents.
    pub fn replace(&self, store: PatternStore) -> PatternStore {
        self.update(|current| std::mem::replace(current, store))
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> PatternStore {
        self.read().clone()
    }

    /// Put back a previously taken snapshot.
    pub fn restore(&self, snapshot: PatternStore) {
        self.replace(snapshot);
    }

    pub fn add_blocked_host(&self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        self.update(|store| store.blocked_hosts.push(pattern));
    }

    pub fn add_allowed_host(&self, pattern: impl Into<String>) {
        let pattern = pattern.into();
        self.update(|store| store.allowed_hosts.push(pattern));
    }

    pub fn add_blocked_rule(&self, rule: PathRule) {
        self.update(|store| store.blocked_rules.push(rule));
    }

    pub fn add_allowed_rule(&self, rule: PathRule) {
        self.update(|store| store.allowed_rules.push(rule));
    }

    /// Remove every blocked host entry equal to `pattern`. Returns the count removed.
    pub fn remove_blocked_host(&self, pattern: &str) -> usize {
        self.update(|store| remove_all(&mut store.blocked_hosts, pattern))
    }

    /// Remove every allowed host entry equal to `pattern`. Returns the count removed.
    pub fn remove_allowed_host(&self, pattern: &str) -> usize {
        self.update(|store| remove_all(&mut store.allowed_hosts, pattern))
    }
}

impl From<PatternStore> for PatternHandle {
    fn from(store: PatternStore) -> Self {
        Self::new(store)
    }
}

fn remove_all(entries: &mut Vec<String>, pattern: &str) -> usize {
    let before = entries.len();
    entries.retain(|entry| entry != pattern);
    before - entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_contents() {
        let handle = PatternHandle::default();
        let other = handle.clone();
        handle.add_blocked_host("tracker.com");
        assert_eq!(other.read().blocked_hosts, vec!["tracker.com".to_string()]);
    }

    #[test]
    fn test_snapshot_restore() {
        let handle = PatternHandle::new(PatternStore {
            blocked_hosts: vec!["a.com".into()],
            ..Default::default()
        });
        let saved = handle.snapshot();

        handle.add_blocked_host("b.com");
        handle.add_allowed_rule(PathRule::host("c.com"));
        assert_eq!(handle.read().len(), 3);

        handle.restore(saved);
        assert_eq!(handle.read().blocked_hosts, vec!["a.com".to_string()]);
        assert!(handle.read().allowed_rules.is_empty());
    }

    #[test]
    fn test_remove_host() {
        let handle = PatternHandle::default();
        handle.add_blocked_host("a.com");
        handle.add_blocked_host("a.com");
        handle.add_blocked_host("b.com");
        assert_eq!(handle.remove_blocked_host("a.com"), 2);
        assert_eq!(handle.read().blocked_hosts, vec!["b.com".to_string()]);
        assert_eq!(handle.remove_allowed_host("a.com"), 0);
    }

    #[test]
    fn test_store_json() {
        let store: PatternStore = serde_json::from_str(
            r#"{"blockedHosts":["t.com"],"allowedRules":[{"host":"cdn.com","pathStartsWith":"/ok"}]}"#,
        )
        .unwrap();
        assert_eq!(store.blocked_hosts, vec!["t.com".to_string()]);
        assert_eq!(store.allowed_rules, vec![PathRule::with_path("cdn.com", "/ok")]);
        assert!(serde_json::from_str::<PatternStore>(r#"{"blocked":[]}"#).is_err());
    }
}
