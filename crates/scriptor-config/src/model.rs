// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Scriptor engine registry.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Well-known location of the engine factory manifest inside a provider source.
pub const DEFAULT_MANIFEST_PATH: &str = "META-INF/services/scriptor.EngineFactory";

/// Default selection filter for map-backed binding contributors.
pub const DEFAULT_MAP_FILTER: &str = "(script.name=*)";

/// Every config section with the keys it accepts, in file order.
///
/// Kept next to the structs below; diagnostics use it to point a misplaced or
/// misspelled key at the section it belongs to.
pub const SECTIONS: &[(&str, &[&str])] = &[
    ("engine", &["manifest_path", "source_paths"]),
    ("bindings", &["map_filter", "any_scopes"]),
    ("cache", &["enabled", "max_entries"]),
    ("logging", &["level"]),
];

/// Keys accepted by `section`, or `None` for an unknown section.
pub fn section_keys(section: &str) -> Option<&'static [&'static str]> {
    SECTIONS
        .iter()
        .find(|(name, _)| *name == section)
        .map(|(_, keys)| *keys)
}

/// Top-level Scriptor configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptorConfig {
    /// Engine registry and provider source settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Binding contributor settings.
    #[serde(default)]
    pub bindings: BindingsConfig,

    /// Script service cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScriptorConfig {
    /// The effective configuration as TOML, every section spelled out.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Engine registry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Path of the factory manifest, relative to each provider source root.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Directories activated as provider sources at startup.
    #[serde(default)]
    pub source_paths: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            source_paths: Vec::new(),
        }
    }
}

fn default_manifest_path() -> String {
    DEFAULT_MANIFEST_PATH.to_string()
}

/// Binding contributor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BindingsConfig {
    /// Selection filter for map-backed contributors. A filter that fails to
    /// parse disables map tracking only.
    #[serde(default = "default_map_filter")]
    pub map_filter: String,

    /// Scope values that mark a contributor as applying to every engine.
    /// Compared case-insensitively.
    #[serde(default = "default_any_scopes")]
    pub any_scopes: Vec<String>,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            map_filter: default_map_filter(),
            any_scopes: default_any_scopes(),
        }
    }
}

fn default_map_filter() -> String {
    DEFAULT_MAP_FILTER.to_string()
}

fn default_any_scopes() -> Vec<String> {
    vec!["*".to_string(), "ANY".to_string()]
}

/// Script service cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether resolved scripts share a service cache.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of cached entries.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_max_entries(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_entries() -> usize {
    1024
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
