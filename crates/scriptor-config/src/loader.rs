// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./scriptor.toml` > `~/.config/scriptor/scriptor.toml` >
//! `/etc/scriptor/scriptor.toml` with environment variable overrides via `SCRIPTOR_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ScriptorConfig;

pub(crate) const SYSTEM_CONFIG: &str = "/etc/scriptor/scriptor.toml";
pub(crate) const LOCAL_CONFIG: &str = "scriptor.toml";

/// Location of the per-user config file, if the platform has a config dir.
pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scriptor/scriptor.toml"))
}

/// Config files consulted by [`load_config`], lowest precedence first.
/// Missing files are listed too; Figment skips them.
pub fn config_files() -> Vec<PathBuf> {
    let mut files = vec![PathBuf::from(SYSTEM_CONFIG)];
    files.extend(user_config_path());
    files.push(PathBuf::from(LOCAL_CONFIG));
    files
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/scriptor/scriptor.toml` (system-wide)
/// 3. `~/.config/scriptor/scriptor.toml` (user XDG config)
/// 4. `./scriptor.toml` (local directory)
/// 5. `SCRIPTOR_*` environment variables
pub fn load_config() -> Result<ScriptorConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ScriptorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScriptorConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ScriptorConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScriptorConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    config_files()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(ScriptorConfig::default())),
            |figment, file| figment.merge(Toml::file(file)),
        )
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SCRIPTOR_ENGINE_MANIFEST_PATH` must map to
/// `engine.manifest_path`, not `engine.manifest.path`.
fn env_provider() -> Env {
    Env::prefixed("SCRIPTOR_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name onto its dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    key.replacen("engine_", "engine.", 1)
        .replacen("bindings_", "bindings.", 1)
        .replacen("cache_", "cache.", 1)
        .replacen("logging_", "logging.", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections_once() {
        assert_eq!(map_env_key("engine_manifest_path"), "engine.manifest_path");
        assert_eq!(map_env_key("bindings_map_filter"), "bindings.map_filter");
        assert_eq!(map_env_key("cache_max_entries"), "cache.max_entries");
        assert_eq!(map_env_key("logging_level"), "logging.level");
    }

    #[test]
    fn local_config_has_highest_file_precedence() {
        let files = config_files();
        assert_eq!(files.first(), Some(&PathBuf::from(SYSTEM_CONFIG)));
        assert_eq!(files.last(), Some(&PathBuf::from(LOCAL_CONFIG)));
    }

    #[test]
    fn unknown_env_keys_pass_through() {
        assert_eq!(map_env_key("something_else"), "something_else");
    }
}
