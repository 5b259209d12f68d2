// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the registry, the contributor aggregator, and the
//! resolve facade.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Name/value bindings injected into a script's execution context.
pub type Bindings = BTreeMap<String, serde_json::Value>;

/// Stable identity of a provider source (e.g. the directory it was loaded from).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identity of a dynamically registered service (contributors).
///
/// Ids are handed out in increasing order by whoever registers services, so
/// ordering by id is ordering by registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service#{}", self.0)
    }
}

/// Describes one engine provider: who it is, which language it speaks, and
/// which file extensions and MIME types it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Engine implementation name (e.g. "Template Engine").
    pub engine_name: String,
    /// Engine implementation version.
    pub engine_version: String,
    /// Language names this engine answers to, canonical name first.
    pub names: Vec<String>,
    /// Canonical language name.
    pub language_name: String,
    /// Version of the language implemented.
    pub language_version: String,
    /// File extensions claimed by this engine, in declaration order.
    pub extensions: Vec<String>,
    /// MIME types claimed by this engine, in declaration order.
    pub mime_types: Vec<String>,
}

impl EngineDescriptor {
    /// Create a descriptor whose only language name is `language_name`.
    pub fn new(
        engine_name: impl Into<String>,
        engine_version: impl Into<String>,
        language_name: impl Into<String>,
        language_version: impl Into<String>,
    ) -> Self {
        let language_name = language_name.into();
        Self {
            engine_name: engine_name.into(),
            engine_version: engine_version.into(),
            names: vec![language_name.clone()],
            language_name,
            language_version: language_version.into(),
            extensions: Vec::new(),
            mime_types: Vec::new(),
        }
    }

    /// Add language aliases after the canonical name.
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            let alias = alias.into();
            if !self.names.contains(&alias) {
                self.names.push(alias);
            }
        }
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(extensions.into_iter().map(Into::into));
        self
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types.extend(mime_types.into_iter().map(Into::into));
        self
    }

    /// First declared extension, if any.
    pub fn first_extension(&self) -> Option<&str> {
        self.extensions.first().map(String::as_str)
    }

    /// First declared MIME type, if any.
    pub fn first_mime_type(&self) -> Option<&str> {
        self.mime_types.first().map(String::as_str)
    }
}

/// Topic of an engine registry event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum EventTopic {
    #[strum(serialize = "scriptor/engine-factory/ADDED")]
    FactoryAdded,
    #[strum(serialize = "scriptor/engine-factory/REMOVED")]
    FactoryRemoved,
}

/// Announcement that a single engine factory was registered or unregistered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineEvent {
    pub topic: EventTopic,
    pub engine_name: String,
    pub engine_version: String,
    pub extensions: Vec<String>,
    pub language_name: String,
    pub language_version: String,
    pub mime_types: Vec<String>,
}

impl EngineEvent {
    pub fn new(topic: EventTopic, descriptor: &EngineDescriptor) -> Self {
        Self {
            topic,
            engine_name: descriptor.engine_name.clone(),
            engine_version: descriptor.engine_version.clone(),
            extensions: descriptor.extensions.clone(),
            language_name: descriptor.language_name.clone(),
            language_version: descriptor.language_version.clone(),
            mime_types: descriptor.mime_types.clone(),
        }
    }
}
