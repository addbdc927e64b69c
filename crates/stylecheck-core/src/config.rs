//! Configuration resolution.
//!
//! Turns the caller's raw options object into a validated, deterministic
//! list of configured rules: camelCase normalization, preset expansion,
//! unknown-key detection and fail-fast per-rule validation.

use serde_json::{Map, Value};

use crate::registry::RuleRegistry;
use crate::rule::RuleConfigError;

/// Top-level option names reserved by the framework (not rule names).
pub const RESERVED_OPTIONS: &[&str] = &["preset"];

/// A configuration that the checker refused.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The raw configuration was not a JSON object.
    #[error("configuration must be a JSON object")]
    NotAnObject,

    /// The configuration string was not valid JSON.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Top-level keys that are neither rules nor reserved options.
    #[error("unsupported rule option(s): {}", .rules.join(", "))]
    UnsupportedRules {
        /// The offending keys, in configuration order.
        rules: Vec<String>,
    },

    /// Non-camelCase keys were found. The message carries the fully
    /// converted configuration so the user can paste the correction.
    #[error("configuration options must be camelCase; use this instead:\n{suggested}")]
    NotCamelCase {
        /// The whole configuration with every key converted.
        suggested: String,
    },

    /// `preset` named a preset that is not registered.
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),

    /// `preset` was present but not a string.
    #[error("`preset` must be a string naming a preset")]
    PresetNotAString,

    /// A rule rejected its option value.
    #[error("invalid configuration for `{rule}`: {source}")]
    Rule {
        /// The rule whose option was invalid.
        rule: String,
        /// The rule's own description of the problem.
        source: RuleConfigError,
    },
}

/// One rule name with its validated raw option value, ready to be
/// instantiated per file.
#[derive(Debug, Clone)]
pub(crate) struct ConfiguredRule {
    pub(crate) name: &'static str,
    pub(crate) value: Value,
}

/// Converts a `snake_case` / `kebab-case` key to camelCase.
#[must_use]
pub fn to_camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn is_camel_case(key: &str) -> bool {
    !key.contains('_') && !key.contains('-')
}

/// Resolves a raw options object against the registry.
///
/// Returns configured rules in registration order (deterministic across
/// runs). The first invalid rule value aborts the whole resolution.
pub(crate) fn resolve(
    registry: &RuleRegistry,
    raw: &Map<String, Value>,
) -> Result<Vec<ConfiguredRule>, ConfigError> {
    // camelCase contract first: the suggested-config message should show
    // the user's full configuration, pre-expansion.
    if raw.keys().any(|k| !is_camel_case(k)) {
        let converted: Map<String, Value> = raw
            .iter()
            .map(|(k, v)| (to_camel_case(k), v.clone()))
            .collect();
        let suggested = serde_json::to_string_pretty(&Value::Object(converted))?;
        return Err(ConfigError::NotCamelCase { suggested });
    }

    let expanded = expand_preset(registry, raw)?;

    let unknown: Vec<String> = expanded
        .keys()
        .filter(|k| !RESERVED_OPTIONS.contains(&k.as_str()) && !registry.is_registered(k))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ConfigError::UnsupportedRules { rules: unknown });
    }

    let mut configured = Vec::new();
    for name in registry.names() {
        let Some(value) = expanded.get(name) else {
            continue;
        };
        // Validate now so a bad shape fails before any file is checked.
        let mut rule = registry
            .factory(name)
            .map(|f| f())
            .ok_or_else(|| ConfigError::UnsupportedRules {
                rules: vec![name.to_string()],
            })?;
        rule.configure(value).map_err(|source| ConfigError::Rule {
            rule: name.to_string(),
            source,
        })?;
        configured.push(ConfiguredRule {
            name,
            value: value.clone(),
        });
    }
    Ok(configured)
}

/// Merges a named preset under the user's explicit options (user wins).
fn expand_preset(
    registry: &RuleRegistry,
    raw: &Map<String, Value>,
) -> Result<Map<String, Value>, ConfigError> {
    let Some(preset_value) = raw.get("preset") else {
        return Ok(raw.clone());
    };
    let name = preset_value.as_str().ok_or(ConfigError::PresetNotAString)?;
    let preset = registry
        .preset(name)
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))?;

    let mut merged = preset.clone();
    for (key, value) in raw {
        if key != "preset" {
            merged.insert(key.clone(), value.clone());
        }
    }
    Ok(merged)
}
