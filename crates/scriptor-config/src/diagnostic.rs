// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Miette diagnostics for configuration errors.
//!
//! Figment reports each failure with the dotted path of the offending key.
//! Those failures are mapped onto [`ConfigError`] using the section table in
//! [`crate::model::SECTIONS`], so that a key placed in the wrong section is
//! pointed at its real home and a misspelled one gets a suggestion. When the
//! TOML that produced the error can be read back, the diagnostic carries a
//! span on the offending line.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use std::path::Path;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::model::{SECTIONS, section_keys};

/// Jaro-Winkler score above which a known name is offered as a correction.
const SIMILARITY: f64 = 0.8;

/// A configuration error rendered through miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A top-level table that is not one of the config sections.
    #[error("unknown configuration section `[{section}]`")]
    #[diagnostic(code(scriptor::config::unknown_section), help("{help}"))]
    UnknownSection {
        section: String,
        help: String,
        #[label("not a scriptor section")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A key that its section does not accept.
    #[error("unknown key `{key}` in `[{section}]`")]
    #[diagnostic(code(scriptor::config::unknown_key), help("{help}"))]
    UnknownKey {
        section: String,
        key: String,
        help: String,
        #[label("not accepted here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(scriptor::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// Dotted key, e.g. `cache.max_entries`.
        key: String,
        found: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that parsed but makes no sense.
    #[error("validation error: {message}")]
    #[diagnostic(code(scriptor::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(scriptor::config::other))]
    Other(String),
}

/// TOML text that an error may be located in.
struct Located {
    name: String,
    content: String,
}

impl Located {
    /// The TOML behind `error`: the file Figment read it from, or `inline`.
    fn for_error(error: &figment::Error, inline: Option<&str>) -> Option<Self> {
        let file = error
            .metadata
            .as_ref()
            .and_then(|m| m.source.as_ref())
            .and_then(|s| s.file_path());
        match (file, inline) {
            (Some(path), _) => Self::read(path),
            (None, Some(content)) => Some(Self {
                name: "<inline>".to_string(),
                content: content.to_string(),
            }),
            (None, None) => None,
        }
    }

    fn read(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Some(Self {
            name: path.display().to_string(),
            content,
        })
    }

    /// Span and source for `needle`, located by `find`.
    fn span(
        located: Option<Self>,
        find: impl FnOnce(&str) -> Option<(usize, usize)>,
    ) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
        let Some(located) = located else {
            return (None, None);
        };
        match find(&located.content) {
            Some((offset, len)) => (
                Some(SourceSpan::new(offset.into(), len)),
                Some(NamedSource::new(located.name, located.content)),
            ),
            None => (None, None),
        }
    }
}

/// Convert a Figment error into one diagnostic per reported failure.
///
/// `inline` is the TOML text when the configuration was loaded from a string
/// rather than a file.
pub fn figment_to_config_errors(err: figment::Error, inline: Option<&str>) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let path: Vec<String> = error.path.clone();
            match &error.kind {
                Kind::UnknownField(field, _) if path.is_empty() => {
                    let located = Located::for_error(&error, inline);
                    let (span, src) = Located::span(located, |c| header_offset(c, field));
                    ConfigError::UnknownSection {
                        section: field.clone(),
                        help: section_help(field),
                        span,
                        src,
                    }
                }
                Kind::UnknownField(field, _) => {
                    let section = path.join(".");
                    let located = Located::for_error(&error, inline);
                    let (span, src) =
                        Located::span(located, |c| key_offset(c, Some(&section), field));
                    ConfigError::UnknownKey {
                        help: key_help(&section, field),
                        section,
                        key: field.clone(),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(found, expected) => {
                    let (section, field) = match path.split_last() {
                        Some((field, [])) => (None, field.clone()),
                        Some((field, section)) => (Some(section.join(".")), field.clone()),
                        None => (None, String::new()),
                    };
                    let located = Located::for_error(&error, inline);
                    let (span, src) =
                        Located::span(located, |c| key_offset(c, section.as_deref(), &field));
                    ConfigError::InvalidType {
                        key: path.join("."),
                        found: found.to_string(),
                        expected: expected.clone(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Help for an unknown top-level table.
fn section_help(section: &str) -> String {
    let names: Vec<&str> = SECTIONS.iter().map(|(name, _)| *name).collect();
    if let Some((home, _)) = SECTIONS.iter().find(|(_, keys)| keys.contains(&section)) {
        return format!("`{section}` is a key of `[{home}]`");
    }
    match closest(section, &names) {
        Some(name) => format!("did you mean `[{name}]`? sections: {}", names.join(", ")),
        None => format!("sections: {}", names.join(", ")),
    }
}

/// Help for a key its section does not accept.
///
/// A key that another section accepts is pointed there; otherwise the
/// closest key of this section is suggested.
pub fn key_help(section: &str, key: &str) -> String {
    if let Some((home, _)) = SECTIONS
        .iter()
        .find(|(name, keys)| *name != section && keys.contains(&key))
    {
        return format!("`{key}` belongs in `[{home}]`");
    }
    let keys = section_keys(section).unwrap_or(&[]);
    match closest(key, keys) {
        Some(known) => format!("did you mean `{known}`? `[{section}]` accepts: {}", keys.join(", ")),
        None => format!("`[{section}]` accepts: {}", keys.join(", ")),
    }
}

/// The candidate most similar to `unknown`, if any is similar enough.
pub fn closest<'a>(unknown: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (strsim::jaro_winkler(unknown, c), *c))
        .filter(|(score, _)| *score > SIMILARITY)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, c)| c)
}

/// Offset and length of the name inside a `[section]` header.
fn header_offset(content: &str, section: &str) -> Option<(usize, usize)> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let indent = line.len() - line.trim_start().len();
        if let Some(rest) = line.trim_start().strip_prefix('[')
            && rest.split(']').next().map(str::trim) == Some(section)
        {
            let name_at = indent + 1 + (rest.len() - rest.trim_start().len());
            return Some((offset + name_at, section.len()));
        }
        offset += line.len();
    }
    None
}

/// Offset and length of `key` as assigned inside `section` (`None` for
/// top-level keys before any header).
///
/// Headers are tracked line by line, so a key is only matched inside the
/// table it was reported for.
pub fn key_offset(content: &str, section: Option<&str>, key: &str) -> Option<(usize, usize)> {
    if key.is_empty() {
        return None;
    }
    let mut current: Option<&str> = None;
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('[') {
            current = rest.split(']').next().map(str::trim);
        } else if current == section
            && let Some(after) = trimmed.strip_prefix(key)
            && after.trim_start().starts_with('=')
        {
            return Some((offset + line.len() - trimmed.len(), key.len()));
        }
        offset += line.len();
    }
    None
}

/// Print every error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
