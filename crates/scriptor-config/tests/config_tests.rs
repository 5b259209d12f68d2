// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Scriptor configuration system.

use scriptor_config::diagnostic::{closest, ConfigError};
use scriptor_config::model::{ScriptorConfig, DEFAULT_MANIFEST_PATH, DEFAULT_MAP_FILTER};
use scriptor_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_scriptor_config() {
    let toml = r#"
[engine]
manifest_path = "META-INF/engines.list"
source_paths = ["engines/lua", "engines/tpl"]

[bindings]
map_filter = "(&(script.name=*)(vendor=acme))"
any_scopes = ["*", "ANY", "all"]

[cache]
enabled = false
max_entries = 16

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.engine.manifest_path, "META-INF/engines.list");
    assert_eq!(config.engine.source_paths, vec!["engines/lua", "engines/tpl"]);
    assert_eq!(config.bindings.map_filter, "(&(script.name=*)(vendor=acme))");
    assert_eq!(config.bindings.any_scopes, vec!["*", "ANY", "all"]);
    assert!(!config.cache.enabled);
    assert_eq!(config.cache.max_entries, 16);
    assert_eq!(config.logging.level, "debug");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.engine.manifest_path, DEFAULT_MANIFEST_PATH);
    assert!(config.engine.source_paths.is_empty());
    assert_eq!(config.bindings.map_filter, DEFAULT_MAP_FILTER);
    assert_eq!(config.bindings.any_scopes, vec!["*", "ANY"]);
    assert!(config.cache.enabled);
    assert_eq!(config.cache.max_entries, 1024);
    assert_eq!(config.logging.level, "info");
}

/// Unknown field in [engine] is rejected by deny_unknown_fields.
#[test]
fn unknown_field_in_engine_produces_error() {
    let toml = r#"
[engine]
manifest_pth = "x"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("manifest_pth"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[console]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("console"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// A dotted override, as produced by the env provider, wins over TOML.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[engine]
manifest_path = "from-toml"
"#;

    let config: ScriptorConfig = Figment::new()
        .merge(Serialized::defaults(ScriptorConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("engine.manifest_path", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.engine.manifest_path, "from-env");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: ScriptorConfig = Figment::new()
        .merge(Serialized::defaults(ScriptorConfig::default()))
        .merge(Toml::file("/nonexistent/path/scriptor.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.engine.manifest_path, DEFAULT_MANIFEST_PATH);
}

/// Unknown key in [bindings] produces an UnknownKey diagnostic with a suggestion
/// and a span on the offending line.
#[test]
fn diagnostic_error_includes_unknown_key() {
    let toml = r#"
[bindings]
map_filtr = "(script.name=*)"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let found = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { section, key, help, span, .. } => {
            Some((section.clone(), key.clone(), help.clone(), *span))
        }
        _ => None,
    });
    let (section, key, help, span) = found.expect("UnknownKey expected");
    assert_eq!(section, "bindings");
    assert_eq!(key, "map_filtr");
    assert!(help.contains("did you mean `map_filter`"), "got: {help}");
    let span = span.expect("span should be located");
    assert_eq!(&toml[span.offset()..span.offset() + span.len()], "map_filtr");
}

/// A key written under the wrong section is pointed at its own section.
#[test]
fn misplaced_key_names_its_section() {
    let toml = "[cache]\nlevel = \"debug\"\n";
    let errors = load_and_validate_str(toml).expect_err("should reject misplaced key");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { help, .. } if help == "`level` belongs in `[logging]`"
    )));
}

/// An unknown top-level table is reported as a section, with a suggestion.
#[test]
fn unknown_section_is_reported() {
    let toml = "[cahce]\nenabled = true\n";
    let errors = load_and_validate_str(toml).expect_err("should reject unknown section");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownSection { section, help, span: Some(_), .. }
            if section == "cahce" && help.contains("`[cache]`")
    )), "got: {errors:?}");
}

/// Invalid type (string where number expected) is located by dotted key.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[cache]
max_entries = "lots"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject invalid type");
    let has_invalid_type = errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "cache.max_entries"));
    assert!(has_invalid_type, "expected InvalidType, got: {errors:?}");
}

/// Errors from a config file are located by re-reading that file.
#[test]
fn file_errors_carry_source_spans() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scriptor.toml");
    std::fs::write(&path, "[engine]\nsource_path = [\"x\"]\n").unwrap();

    let errors = scriptor_config::load_and_validate_path(&path).expect_err("should fail");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, span: Some(_), src: Some(_), .. } if key == "source_path"
    )), "got: {errors:?}");
}

#[test]
fn closest_match_needs_real_similarity() {
    assert_eq!(closest("sourc_paths", &["manifest_path", "source_paths"]), Some("source_paths"));
    assert_eq!(closest("levl", &["level"]), Some("level"));
    assert!(closest("qqqq", &["enabled", "max_entries"]).is_none());
}

/// ConfigError implements miette::Diagnostic and renders.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        section: "engine".to_string(),
        key: "manifest_pth".to_string(),
        help: scriptor_config::diagnostic::key_help("engine", "manifest_pth"),
        span: None,
        src: None,
    };

    assert!(error.code().is_some(), "should have diagnostic code");
    let help = error.help().expect("should have help text").to_string();
    assert!(help.contains("did you mean `manifest_path`"), "got: {help}");

    let handler = GraphicalReportHandler::new();
    let mut buf = String::new();
    handler
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("manifest_pth"));
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn validation_catches_absolute_manifest_path() {
    let toml = r#"
[engine]
manifest_path = "/abs/path"
"#;

    let errors = load_and_validate_str(toml).expect_err("absolute manifest path should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("manifest_path"))
    ));
}

/// load_and_validate_str with valid TOML returns Ok config.
#[test]
fn load_and_validate_valid_toml() {
    let toml = r#"
[logging]
level = "warn"
"#;

    let config = load_and_validate_str(toml).expect("valid TOML should validate");
    assert_eq!(config.logging.level, "warn");
}

/// The effective config dumps to TOML that loads back to the same values.
#[test]
fn config_dumps_to_loadable_toml() {
    let mut config = ScriptorConfig::default();
    config.engine.source_paths = vec!["engines".to_string()];
    let dumped = config.to_toml_string().expect("should serialize");
    assert!(dumped.contains("[cache]"));

    let reloaded = load_and_validate_str(&dumped).expect("dump should load");
    assert_eq!(reloaded.engine.source_paths, vec!["engines"]);
    assert_eq!(reloaded.cache.max_entries, config.cache.max_entries);
}

/// Config round-trips through serde so it can be dumped for diagnostics.
#[test]
fn config_serializes_to_json() {
    let config = ScriptorConfig::default();
    let json = serde_json::to_value(&config).expect("should serialize");
    assert_eq!(json["engine"]["manifest_path"], DEFAULT_MANIFEST_PATH);
    assert_eq!(json["cache"]["max_entries"], 1024);
}
