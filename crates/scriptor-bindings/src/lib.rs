// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Binding contributors for script execution.
//!
//! Contributors supply extra name/value bindings to scripts. Each one is
//! scoped either to every engine or to one language name; the
//! [`ContributorAggregator`] partitions them accordingly and answers which
//! contributors apply to a given engine. The [`ContributorTracker`] feeds the
//! aggregator from dynamic service registrations, wrapping plain maps in a
//! [`MapBindingsProvider`] when they pass the configured [`PropertyFilter`].

pub mod aggregator;
pub mod filter;
pub mod map;
pub mod tracker;

pub use aggregator::ContributorAggregator;
pub use filter::{FilterError, PropertyFilter};
pub use map::MapBindingsProvider;
pub use tracker::{
    ContributorRegistration, ContributorService, ContributorTracker, Properties, SCOPE_PROPERTY,
};
