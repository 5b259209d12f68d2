// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as relative manifest paths, non-empty scope lists, and known log levels.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::ScriptorConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ScriptorConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let manifest_path = config.engine.manifest_path.trim();
    if manifest_path.is_empty() {
        errors.push(ConfigError::Validation {
            message: "engine.manifest_path must not be empty".to_string(),
        });
    } else if manifest_path.starts_with('/') {
        // The manifest is looked up inside every provider source.
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.manifest_path `{manifest_path}` must be relative to the provider source root"
            ),
        });
    }

    let mut seen_sources = HashSet::new();
    for path in &config.engine.source_paths {
        if path.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "engine.source_paths must not contain empty entries".to_string(),
            });
        } else if !seen_sources.insert(path.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("duplicate provider source `{path}` in engine.source_paths"),
            });
        }
    }

    if config.bindings.any_scopes.is_empty() {
        errors.push(ConfigError::Validation {
            message: "bindings.any_scopes must list at least one scope".to_string(),
        });
    }

    if config.bindings.any_scopes.iter().any(|s| s.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: "bindings.any_scopes must not contain empty entries".to_string(),
        });
    }

    if config.cache.enabled && config.cache.max_entries == 0 {
        errors.push(ConfigError::Validation {
            message: "cache.max_entries must be at least 1 when the cache is enabled".to_string(),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = ScriptorConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_manifest_path_fails_validation() {
        let mut config = ScriptorConfig::default();
        config.engine.manifest_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "manifest_path must not be empty"));
    }

    #[test]
    fn absolute_manifest_path_fails_validation() {
        let mut config = ScriptorConfig::default();
        config.engine.manifest_path = "/etc/factories".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "must be relative"));
    }

    #[test]
    fn duplicate_source_paths_fail_validation() {
        let mut config = ScriptorConfig::default();
        config.engine.source_paths = vec!["engines/lua".into(), "engines/lua".into()];
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "duplicate provider source"));
    }

    #[test]
    fn empty_any_scopes_fails_validation() {
        let mut config = ScriptorConfig::default();
        config.bindings.any_scopes.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "any_scopes must list"));
    }

    #[test]
    fn zero_cache_entries_only_matters_when_enabled() {
        let mut config = ScriptorConfig::default();
        config.cache.max_entries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "cache.max_entries"));

        config.cache.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = ScriptorConfig::default();
        config.logging.level = "chatty".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "chatty"));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = ScriptorConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = ScriptorConfig::default();
        config.engine.manifest_path = String::new();
        config.bindings.any_scopes.clear();
        config.logging.level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
