// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for the Scriptor engine registry.
//!
//! Sections are `[engine]`, `[bindings]`, `[cache]` and `[logging]`. Values
//! come from compiled defaults, then the files in [`config_files`], then
//! `SCRIPTOR_*` environment variables. Unknown keys, mistyped values and
//! semantic problems are all reported as [`ConfigError`] diagnostics.
//!
//! ```no_run
//! match scriptor_config::load_and_validate() {
//!     Ok(config) => println!("manifest: {}", config.engine.manifest_path),
//!     Err(errors) => scriptor_config::render_errors(&errors),
//! }
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

use tracing::debug;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{config_files, load_config, load_config_from_path, load_config_from_str};
pub use model::ScriptorConfig;

/// Load configuration from the standard locations and validate it.
pub fn load_and_validate() -> Result<ScriptorConfig, Vec<ConfigError>> {
    debug!(files = ?loader::config_files(), "loading configuration");
    finish(loader::load_config(), None)
}

/// Load configuration from `path` (plus env overrides) instead of the
/// standard locations, and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<ScriptorConfig, Vec<ConfigError>> {
    debug!(file = %path.display(), "loading configuration");
    finish(loader::load_config_from_path(path), None)
}

/// Load configuration from TOML text and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ScriptorConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), Some(toml_content))
}

/// Validate a loaded config, or turn the load failure into diagnostics.
/// File-backed errors are located by re-reading the file Figment names.
fn finish(
    loaded: Result<ScriptorConfig, figment::Error>,
    inline: Option<&str>,
) -> Result<ScriptorConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, inline))?;
    validation::validate_config(&config)?;
    Ok(config)
}
