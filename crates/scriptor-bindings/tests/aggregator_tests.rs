// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for contributor aggregation across languages.

use std::sync::Arc;
use std::thread;

use scriptor_bindings::{ContributorAggregator, ContributorRegistration, ContributorTracker};
use scriptor_core::{Bindings, BindingsValuesProvider, ServiceId, ServiceListener};
use scriptor_test_utils::MockBindingsProvider;
use serde_json::json;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn keys(contributors: &[Arc<dyn BindingsValuesProvider>]) -> Vec<String> {
    let mut keys = Vec::new();
    for contributor in contributors {
        let mut bindings = Bindings::new();
        contributor.add_bindings(&mut bindings);
        keys.extend(bindings.into_keys());
    }
    keys
}

#[test]
fn generic_and_language_contributors_combine() {
    let aggregator = ContributorAggregator::default();
    aggregator.add(ServiceId(1), None, Arc::new(MockBindingsProvider::new("G")));
    aggregator.add(ServiceId(2), Some("python"), Arc::new(MockBindingsProvider::new("P")));

    assert_eq!(keys(&aggregator.contributors_for(&names(&["python"]))), vec!["G", "P"]);

    aggregator.remove(ServiceId(1));
    assert_eq!(keys(&aggregator.contributors_for(&names(&["python"]))), vec!["P"]);
    assert!(aggregator.contributors_for(&names(&["ruby"])).is_empty());
}

#[test]
fn modify_moves_contributor_from_generic_to_language() {
    let aggregator = ContributorAggregator::default();
    let provider: Arc<dyn BindingsValuesProvider> = Arc::new(MockBindingsProvider::new("C"));
    aggregator.add(ServiceId(1), Some("*"), Arc::clone(&provider));
    aggregator.modify(ServiceId(1), Some("lua"), provider);

    assert_eq!(keys(&aggregator.contributors_for(&names(&["lua"]))), vec!["C"]);
    assert!(aggregator.contributors_for(&[]).is_empty());
    assert_eq!(aggregator.len(), 1);
}

#[test]
fn any_alias_of_the_engine_selects_the_bucket() {
    let aggregator = ContributorAggregator::default();
    aggregator.add(ServiceId(1), Some("js"), Arc::new(MockBindingsProvider::new("J")));

    let engine_names = names(&["ECMAScript", "javascript", "js"]);
    assert_eq!(keys(&aggregator.contributors_for(&engine_names)), vec!["J"]);
}

#[test]
fn map_contributor_yields_exactly_its_entries() {
    let aggregator = Arc::new(ContributorAggregator::default());
    let tracker = ContributorTracker::new(Arc::clone(&aggregator), "(script.name=*)");

    let values: Bindings = [
        ("site".to_string(), json!("example")),
        ("limit".to_string(), json!(10)),
    ]
    .into_iter()
    .collect();
    tracker.on_add(ContributorRegistration::map(ServiceId(7), values.clone()).scoped("*"));

    let contributors = aggregator.contributors_for(&[]);
    assert_eq!(contributors.len(), 1);
    let mut bindings = Bindings::new();
    contributors[0].add_bindings(&mut bindings);
    assert_eq!(bindings, values);
}

#[test]
fn concurrent_registration_and_lookup() {
    let aggregator = Arc::new(ContributorAggregator::default());
    let writers: Vec<_> = (0..4u64)
        .map(|t| {
            let aggregator = Arc::clone(&aggregator);
            thread::spawn(move || {
                for i in 0..50u64 {
                    let id = ServiceId(t * 1000 + i);
                    let scope = if i % 2 == 0 { Some("lua") } else { None };
                    aggregator.add(id, scope, Arc::new(MockBindingsProvider::new("x")));
                    let _ = aggregator.contributors_for(&names(&["lua"]));
                    if i % 5 == 0 {
                        aggregator.remove(id);
                    }
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    // 50 per thread, every fifth removed.
    assert_eq!(aggregator.len(), 4 * 40);
}

mod prop {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(u64, Option<&'static str>),
        Modify(u64, Option<&'static str>),
        Remove(u64),
    }

    fn scope() -> impl Strategy<Value = Option<&'static str>> {
        prop_oneof![
            Just(None),
            Just(Some("*")),
            Just(Some("any")),
            Just(Some("lua")),
            Just(Some("python")),
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u64..6, scope()).prop_map(|(id, s)| Op::Add(id, s)),
            (0u64..6, scope()).prop_map(|(id, s)| Op::Modify(id, s)),
            (0u64..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        /// Every id ends up in at most one bucket, and lookups agree with a
        /// plain map from id to scope.
        #[test]
        fn buckets_agree_with_model(ops in proptest::collection::vec(op(), 0..32)) {
            let aggregator = ContributorAggregator::default();
            let mut model: std::collections::BTreeMap<u64, Option<&'static str>> = Default::default();

            for op in ops {
                match op.clone() {
                    Op::Add(id, scope) | Op::Modify(id, scope) => {
                        let provider = Arc::new(MockBindingsProvider::new(&id.to_string()));
                        if matches!(op, Op::Add(..)) {
                            aggregator.add(ServiceId(id), scope, provider);
                        } else {
                            aggregator.modify(ServiceId(id), scope, provider);
                        }
                        let generic = scope.is_none_or(|s| s == "*" || s.eq_ignore_ascii_case("any"));
                        model.insert(id, if generic { None } else { scope });
                    }
                    Op::Remove(id) => {
                        aggregator.remove(ServiceId(id));
                        model.remove(&id);
                    }
                }
            }

            prop_assert_eq!(aggregator.len(), model.len());

            for language in ["lua", "python"] {
                let expected: Vec<String> = model
                    .iter()
                    .filter(|(_, s)| s.is_none())
                    .chain(model.iter().filter(|(_, s)| **s == Some(language)))
                    .map(|(id, _)| id.to_string())
                    .collect();
                prop_assert_eq!(keys(&aggregator.contributors_for(&names(&[language]))), expected);
            }
        }
    }
}
