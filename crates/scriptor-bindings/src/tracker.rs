// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feeds the contributor aggregator from dynamic service registrations.
//!
//! Native contributors are always tracked. Plain maps are tracked only when
//! their registration properties pass the configured selection filter, and
//! not at all if that filter failed to parse.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use scriptor_core::{Bindings, BindingsValuesProvider, ServiceId, ServiceListener};
use tracing::{debug, warn};

use crate::aggregator::ContributorAggregator;
use crate::filter::PropertyFilter;
use crate::map::MapBindingsProvider;

/// Registration property naming the language a contributor is scoped to.
pub const SCOPE_PROPERTY: &str = "script.name";

/// Properties attached to a service registration.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// The service behind a contributor registration.
#[derive(Clone)]
pub enum ContributorService {
    /// Implements the contributor capability directly.
    Native(Arc<dyn BindingsValuesProvider>),
    /// A plain name/value map to be copied into the bindings.
    Map(Bindings),
}

impl fmt::Debug for ContributorService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => f.write_str("Native(..)"),
            Self::Map(values) => f.debug_tuple("Map").field(values).finish(),
        }
    }
}

/// One contributor as announced by the service layer.
#[derive(Debug, Clone)]
pub struct ContributorRegistration {
    pub id: ServiceId,
    pub properties: Properties,
    pub service: ContributorService,
}

impl ContributorRegistration {
    pub fn native(id: ServiceId, provider: Arc<dyn BindingsValuesProvider>) -> Self {
        Self {
            id,
            properties: Properties::new(),
            service: ContributorService::Native(provider),
        }
    }

    pub fn map(id: ServiceId, values: Bindings) -> Self {
        Self {
            id,
            properties: Properties::new(),
            service: ContributorService::Map(values),
        }
    }

    /// Set the language scope property.
    pub fn scoped(self, language: &str) -> Self {
        self.with_property(SCOPE_PROPERTY, serde_json::Value::String(language.to_string()))
    }

    pub fn with_property(mut self, key: &str, value: serde_json::Value) -> Self {
        self.properties.insert(key.to_string(), value);
        self
    }

    /// Language scope from the registration properties, if any.
    pub fn scope(&self) -> Option<&str> {
        self.properties
            .get(SCOPE_PROPERTY)
            .and_then(serde_json::Value::as_str)
    }
}

/// Routes contributor registrations into a [`ContributorAggregator`].
pub struct ContributorTracker {
    aggregator: Arc<ContributorAggregator>,
    map_filter: Option<PropertyFilter>,
}

impl ContributorTracker {
    /// Create a tracker. A `map_filter` that does not parse is logged and
    /// leaves map-backed contributors untracked.
    pub fn new(aggregator: Arc<ContributorAggregator>, map_filter: &str) -> Self {
        let map_filter = match PropertyFilter::parse(map_filter) {
            Ok(filter) => Some(filter),
            Err(e) => {
                warn!(filter = map_filter, error = %e, "cannot track map-based script bindings");
                None
            }
        };
        Self {
            aggregator,
            map_filter,
        }
    }

    /// Returns true if map-backed contributors are being tracked.
    pub fn tracks_maps(&self) -> bool {
        self.map_filter.is_some()
    }

    pub fn aggregator(&self) -> &Arc<ContributorAggregator> {
        &self.aggregator
    }

    fn provider_for(
        &self,
        registration: &ContributorRegistration,
    ) -> Option<Arc<dyn BindingsValuesProvider>> {
        match &registration.service {
            ContributorService::Native(provider) => Some(Arc::clone(provider)),
            ContributorService::Map(values) => {
                let filter = self.map_filter.as_ref()?;
                if !filter.matches(&registration.properties) {
                    debug!(id = %registration.id, filter = %filter, "map contributor not selected");
                    return None;
                }
                Some(Arc::new(MapBindingsProvider::new(values.clone())))
            }
        }
    }
}

impl ServiceListener<ContributorRegistration> for ContributorTracker {
    fn on_add(&self, registration: ContributorRegistration) {
        if let Some(provider) = self.provider_for(&registration) {
            self.aggregator
                .add(registration.id, registration.scope(), provider);
        }
    }

    fn on_update(&self, registration: ContributorRegistration) {
        match self.provider_for(&registration) {
            Some(provider) => self
                .aggregator
                .modify(registration.id, registration.scope(), provider),
            // A map whose properties stopped matching is no longer tracked.
            None => {
                self.aggregator.remove(registration.id);
            }
        }
    }

    fn on_remove(&self, registration: ContributorRegistration) {
        self.aggregator.remove(registration.id);
    }
}
