// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contributor aggregator: partitions contributors into a generic bucket and
//! per-language buckets.
//!
//! Within a bucket contributors are ordered by service id, which is their
//! registration order. A contributor lives in exactly one bucket at a time.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use scriptor_core::{BindingsValuesProvider, ServiceId};
use tracing::debug;

type Bucket = BTreeMap<ServiceId, Arc<dyn BindingsValuesProvider>>;

#[derive(Default)]
struct Buckets {
    generic: Bucket,
    by_language: BTreeMap<String, Bucket>,
}

impl Buckets {
    /// Remove `id` from the generic bucket, or else from the first language
    /// bucket holding it.
    fn remove(&mut self, id: ServiceId) -> bool {
        if self.generic.remove(&id).is_some() {
            return true;
        }
        let Some(language) = self
            .by_language
            .iter()
            .find(|(_, bucket)| bucket.contains_key(&id))
            .map(|(language, _)| language.clone())
        else {
            return false;
        };
        if let Some(bucket) = self.by_language.get_mut(&language) {
            bucket.remove(&id);
            if bucket.is_empty() {
                self.by_language.remove(&language);
            }
        }
        true
    }
}

/// Aggregates binding contributors for lookup by language name.
pub struct ContributorAggregator {
    any_scopes: Vec<String>,
    buckets: RwLock<Buckets>,
}

impl ContributorAggregator {
    /// Create an aggregator that treats any of `any_scopes` (compared
    /// case-insensitively) as "applies to every engine".
    pub fn new<I, S>(any_scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            any_scopes: any_scopes.into_iter().map(Into::into).collect(),
            buckets: RwLock::new(Buckets::default()),
        }
    }

    /// Returns true if a contributor with `scope` belongs in the generic bucket.
    pub fn is_generic(&self, scope: Option<&str>) -> bool {
        match scope {
            None => true,
            Some(scope) => self
                .any_scopes
                .iter()
                .any(|any| any.eq_ignore_ascii_case(scope)),
        }
    }

    /// Insert a contributor under `id`.
    ///
    /// An earlier entry with the same id is replaced, even if it sat in a
    /// different bucket.
    pub fn add(&self, id: ServiceId, scope: Option<&str>, provider: Arc<dyn BindingsValuesProvider>) {
        let mut buckets = self.write();
        buckets.remove(id);
        self.insert(&mut buckets, id, scope, provider);
    }

    /// Replace the contributor under `id`; its scope may move it between buckets.
    pub fn modify(
        &self,
        id: ServiceId,
        scope: Option<&str>,
        provider: Arc<dyn BindingsValuesProvider>,
    ) {
        let mut buckets = self.write();
        buckets.remove(id);
        self.insert(&mut buckets, id, scope, provider);
    }

    /// Remove the contributor under `id`. Unknown ids are ignored.
    pub fn remove(&self, id: ServiceId) -> bool {
        let removed = self.write().remove(id);
        if removed {
            debug!(id = %id, "binding contributor removed");
        }
        removed
    }

    /// Contributors applying to an engine answering to `names`: the generic
    /// ones first, then each matching language bucket in `names` order.
    pub fn contributors_for(&self, names: &[String]) -> Vec<Arc<dyn BindingsValuesProvider>> {
        let buckets = self.read();
        let mut contributors: Vec<Arc<dyn BindingsValuesProvider>> =
            buckets.generic.values().cloned().collect();

        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            if let Some(bucket) = buckets.by_language.get(name) {
                contributors.extend(bucket.values().cloned());
            }
        }
        contributors
    }

    /// Language names that currently have at least one contributor.
    pub fn languages(&self) -> Vec<String> {
        self.read().by_language.keys().cloned().collect()
    }

    /// Total number of contributors across all buckets.
    pub fn len(&self) -> usize {
        let buckets = self.read();
        buckets.generic.len() + buckets.by_language.values().map(BTreeMap::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut buckets = self.write();
        buckets.generic.clear();
        buckets.by_language.clear();
    }

    fn insert(
        &self,
        buckets: &mut Buckets,
        id: ServiceId,
        scope: Option<&str>,
        provider: Arc<dyn BindingsValuesProvider>,
    ) {
        match scope {
            Some(language) if !self.is_generic(scope) => {
                debug!(id = %id, language, "binding contributor added");
                buckets
                    .by_language
                    .entry(language.to_string())
                    .or_default()
                    .insert(id, provider);
            }
            _ => {
                debug!(id = %id, "generic binding contributor added");
                buckets.generic.insert(id, provider);
            }
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Buckets> {
        self.buckets.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Buckets> {
        self.buckets.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ContributorAggregator {
    fn default() -> Self {
        Self::new(["*", "ANY"])
    }
}

impl fmt::Debug for ContributorAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buckets = self.read();
        f.debug_struct("ContributorAggregator")
            .field("any_scopes", &self.any_scopes)
            .field("generic", &buckets.generic.len())
            .field("languages", &buckets.by_language.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptor_core::Bindings;
    use scriptor_test_utils::MockBindingsProvider;

    fn provider(name: &str) -> Arc<dyn BindingsValuesProvider> {
        Arc::new(MockBindingsProvider::new(name))
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Keys produced by running every contributor, in run order.
    fn run(contributors: &[Arc<dyn BindingsValuesProvider>]) -> Vec<String> {
        contributors
            .iter()
            .map(|c| {
                let mut bindings = Bindings::new();
                c.add_bindings(&mut bindings);
                bindings.keys().next().cloned().unwrap_or_default()
            })
            .collect()
    }

    #[test]
    fn wildcard_scopes_are_generic_case_insensitively() {
        let aggregator = ContributorAggregator::default();
        assert!(aggregator.is_generic(None));
        assert!(aggregator.is_generic(Some("*")));
        assert!(aggregator.is_generic(Some("any")));
        assert!(aggregator.is_generic(Some("Any")));
        assert!(!aggregator.is_generic(Some("python")));
    }

    #[test]
    fn custom_any_scopes_replace_defaults() {
        let aggregator = ContributorAggregator::new(["all"]);
        assert!(aggregator.is_generic(Some("ALL")));
        assert!(!aggregator.is_generic(Some("*")));
    }

    #[test]
    fn generic_comes_before_language_buckets() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(1), Some("python"), provider("p"));
        aggregator.add(ServiceId(2), None, provider("g"));

        let found = aggregator.contributors_for(&names(&["python"]));
        assert_eq!(run(&found), vec!["g", "p"]);
    }

    #[test]
    fn buckets_follow_names_order_and_ignore_repeats() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(1), Some("ecmascript"), provider("ecma"));
        aggregator.add(ServiceId(2), Some("js"), provider("js"));

        let found = aggregator.contributors_for(&names(&["js", "ecmascript", "js"]));
        assert_eq!(run(&found), vec!["js", "ecma"]);
    }

    #[test]
    fn within_a_bucket_order_is_by_id() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(9), None, provider("late"));
        aggregator.add(ServiceId(3), None, provider("early"));
        assert_eq!(run(&aggregator.contributors_for(&[])), vec!["early", "late"]);
    }

    #[test]
    fn add_with_existing_id_replaces_it() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(1), Some("lua"), provider("old"));
        aggregator.add(ServiceId(1), None, provider("new"));
        assert_eq!(aggregator.len(), 1);
        assert!(aggregator.languages().is_empty());
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(1), None, provider("g"));
        assert!(!aggregator.remove(ServiceId(42)));
        assert_eq!(aggregator.len(), 1);
    }

    #[test]
    fn removing_last_language_contributor_drops_bucket() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(1), Some("lua"), provider("l"));
        assert_eq!(aggregator.languages(), vec!["lua"]);
        assert!(aggregator.remove(ServiceId(1)));
        assert!(aggregator.languages().is_empty());
        assert!(aggregator.is_empty());
    }

    #[test]
    fn clear_empties_every_bucket() {
        let aggregator = ContributorAggregator::default();
        aggregator.add(ServiceId(1), None, provider("g"));
        aggregator.add(ServiceId(2), Some("lua"), provider("l"));
        aggregator.clear();
        assert!(aggregator.is_empty());
        assert!(aggregator.contributors_for(&names(&["lua"])).is_empty());
    }
}
