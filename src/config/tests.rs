//! Tests for the config module

use super::loader::{load_with_warnings, parse_with_warnings};
use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.engine.internal_dir, ".internal");
    assert!(config.engine.reconcile_on_start);
    assert!(!config.engine.unique_suggestion_codes);
    assert_eq!(config.watch.debounce_ms, 100);
    assert_eq!(config.tools.enabled, vec!["decisions", "decision-index"]);
    assert_eq!(config.decisions.root, "decisions");
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[engine]
internal_dir = ".blueprint"
reconcile_on_start = false
unique_suggestion_codes = true

[watch]
debounce_ms = 250

[tools]
enabled = ["decisions"]

[decisions]
root = "docs/adr"
"#;

    let (config, warnings) = parse_with_warnings(toml, Path::new("blueprint.toml")).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(config.engine.internal_dir, ".blueprint");
    assert!(!config.engine.reconcile_on_start);
    assert!(config.engine.unique_suggestion_codes);
    assert_eq!(config.watch.debounce_ms, 250);
    assert_eq!(config.tools.enabled, vec!["decisions"]);
    assert_eq!(config.decisions.root, "docs/adr");
}

#[test]
fn test_partial_sections_keep_defaults() {
    let (config, _) =
        parse_with_warnings("[watch]\ndebounce_ms = 5\n", Path::new("blueprint.toml")).unwrap();

    assert_eq!(config.watch.debounce_ms, 5);
    assert_eq!(config.engine, EngineConfig::default());
}

#[test]
fn test_unknown_keys_become_warnings() {
    let toml = "[engine]\ninternal_dir = \".internal\"\nreconcile = true\n\n[extras]\nx = 1\n";
    let (_, warnings) = parse_with_warnings(toml, Path::new("blueprint.toml")).unwrap();

    assert_eq!(warnings.len(), 2);
    let reconcile = warnings.iter().find(|w| w.key == "engine.reconcile").unwrap();
    assert_eq!(reconcile.line, Some(3));
    assert_eq!(reconcile.suggestion, None);

    let extras = warnings.iter().find(|w| w.key == "extras").unwrap();
    assert_eq!(extras.line, Some(5));
}

#[test]
fn test_typo_gets_suggestion() {
    let (_, warnings) =
        parse_with_warnings("[watch]\ndebounce_mss = 5\n", Path::new("blueprint.toml")).unwrap();

    assert_eq!(warnings[0].suggestion.as_deref(), Some("debounce_ms"));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let err = parse_with_warnings("[engine\n", Path::new("blueprint.toml")).unwrap_err();
    assert!(matches!(err, crate::error::EngineError::Config { .. }));
}

#[test]
fn test_internal_dir_must_stay_inside_workspace() {
    for bad in ["", "/", "../elsewhere", "a/../../b"] {
        let toml = format!("[engine]\ninternal_dir = \"{bad}\"\n");
        assert!(
            parse_with_warnings(&toml, Path::new("blueprint.toml")).is_err(),
            "accepted {bad:?}"
        );
    }
}

#[test]
fn test_load_reads_project_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(PROJECT_CONFIG_FILE);
    fs::write(&path, "[decisions]\nroot = \"adr\"\n").unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();
    assert_eq!(config.decisions.root, "adr");
    assert!(warnings.is_empty());
    assert_eq!(Config::load(&path).unwrap(), config);
}

#[test]
fn test_env_overrides() {
    let config = apply_overrides(Config::default(), |name| match name {
        "BLUEPRINT_INTERNAL_DIR" => Some("/.cache/bp/".to_string()),
        "BLUEPRINT_DEBOUNCE_MS" => Some("40".to_string()),
        "BLUEPRINT_RECONCILE" => Some("off".to_string()),
        _ => None,
    });

    assert_eq!(config.engine.internal_dir, ".cache/bp");
    assert_eq!(config.watch.debounce_ms, 40);
    assert!(!config.engine.reconcile_on_start);
}

#[test]
fn test_invalid_env_overrides_are_ignored() {
    let config = apply_overrides(Config::default(), |name| match name {
        "BLUEPRINT_INTERNAL_DIR" => Some("..".to_string()),
        "BLUEPRINT_DEBOUNCE_MS" => Some("soon".to_string()),
        "BLUEPRINT_RECONCILE" => Some("maybe".to_string()),
        _ => None,
    });

    assert_eq!(config, Config::default());
}
