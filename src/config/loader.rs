//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, EngineResult};

pub use crate::domain::value_objects::ConfigWarning;

use super::types::Config;

/// Project configuration file name, looked up at the workspace root
pub const PROJECT_CONFIG_FILE: &str = "blueprint.toml";

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> EngineResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    parse_with_warnings(&content, path)
}

/// Parse `content` as if read from `path`
pub fn parse_with_warnings(content: &str, path: &Path) -> EngineResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| EngineError::Config {
        file: path.display().to_string(),
        message: e.to_string(),
    })?;
    config.validate(&path.display().to_string())?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            ConfigWarning {
                file: path.to_path_buf(),
                line: find_line_number(content, &leaf),
                suggestion: suggest_key(&leaf),
                key,
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from the project file, the user file, or defaults, then apply
/// environment overrides.
pub fn load_or_default(workspace_root: &Path) -> EngineResult<(Config, Vec<ConfigWarning>)> {
    let candidates = [
        Some(workspace_root.join(PROJECT_CONFIG_FILE)),
        user_config_path(),
    ];
    for path in candidates.into_iter().flatten() {
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading configuration");
            let (config, warnings) = load_with_warnings(&path)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }
    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// `<config_dir>/blueprint/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("blueprint").join("config.toml"))
}

/// Apply environment variable overrides (BLUEPRINT_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides read through `lookup`; invalid values are ignored with a warning
pub fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(dir) = lookup("BLUEPRINT_INTERNAL_DIR") {
        let trimmed = dir.trim().trim_matches('/');
        if trimmed.is_empty() || trimmed.split('/').any(|s| s == ".." || s == ".") {
            tracing::warn!(value = %dir, "ignoring invalid BLUEPRINT_INTERNAL_DIR");
        } else {
            config.engine.internal_dir = trimmed.to_string();
        }
    }

    if let Some(ms) = lookup("BLUEPRINT_DEBOUNCE_MS") {
        match ms.trim().parse::<u64>() {
            Ok(ms) => config.watch.debounce_ms = ms,
            Err(_) => tracing::warn!(value = %ms, "ignoring invalid BLUEPRINT_DEBOUNCE_MS"),
        }
    }

    if let Some(value) = lookup("BLUEPRINT_RECONCILE") {
        match parse_bool(&value) {
            Some(enabled) => config.engine.reconcile_on_start = enabled,
            None => tracing::warn!(value = %value, "ignoring invalid BLUEPRINT_RECONCILE"),
        }
    }

    config
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            let line = line.trim();
            let assigns = line
                .strip_prefix(needle)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            let table = line.starts_with('[')
                && line.trim_matches(['[', ']']).rsplit('.').next() == Some(needle);
            assigns || table
        })
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "engine",
        "internal_dir",
        "reconcile_on_start",
        "unique_suggestion_codes",
        "watch",
        "debounce_ms",
        "tools",
        "enabled",
        "decisions",
        "root",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
