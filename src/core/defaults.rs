use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::paths;

/// Root configuration structure for item-input.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ItemInputConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// All configurable defaults that can be overridden via item-input.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Defaults {
    /// Summaries shown in menus are clipped to this many characters.
    #[serde(default = "default_max_item_value_length")]
    pub max_item_value_length: usize,

    #[serde(default = "default_json_indent")]
    pub json_indent: usize,

    /// Answer used by boolean definitions that don't set their own default.
    #[serde(default = "default_boolean_default")]
    pub boolean_default: bool,

    /// Minimum item count for lists that don't set their own.
    #[serde(default = "default_list_min_items")]
    pub list_min_items: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            max_item_value_length: default_max_item_value_length(),
            json_indent: default_json_indent(),
            boolean_default: default_boolean_default(),
            list_min_items: default_list_min_items(),
        }
    }
}

fn default_max_item_value_length() -> usize {
    60
}

fn default_json_indent() -> usize {
    4
}

fn default_boolean_default() -> bool {
    true
}

fn default_list_min_items() -> usize {
    1
}

/// Built-in defaults, ignoring any config file.
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, merging file config with built-in defaults.
/// If item-input.json is missing or invalid, silently returns built-in defaults.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full item-input.json config, falling back to defaults on any error.
pub fn load_config() -> ItemInputConfig {
    match paths::config_json() {
        Ok(path) if path.exists() => load_config_from_path(&path).unwrap_or_else(|err| {
            crate::log_status!("config", "Ignoring {}: {}", path.display(), err);
            ItemInputConfig::default()
        }),
        _ => ItemInputConfig::default(),
    }
}

/// Load config from an explicit file.
pub fn load_config_from_path(path: &Path) -> crate::Result<ItemInputConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        crate::Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    let config: ItemInputConfig = serde_json::from_str(&content)
        .map_err(|e| crate::Error::config_invalid_json(path.display().to_string(), e))?;

    Ok(config)
}

/// Check if item-input.json file exists
pub fn config_exists() -> bool {
    paths::config_json().map(|p| p.exists()).unwrap_or(false)
}
