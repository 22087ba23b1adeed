use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "ITEM_INPUT_CONFIG";

/// Base config directory (universal ~/.config/item-input/ on all platforms)
pub fn item_input() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("item-input"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("item-input"))
    }
}

/// Global item-input.json config file path, honoring `ITEM_INPUT_CONFIG`.
pub fn config_json() -> Result<PathBuf> {
    match env::var(CONFIG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => expand(&raw),
        _ => Ok(item_input()?.join("item-input.json")),
    }
}

/// Expand `~` and `$VARS` in a user-supplied path.
pub fn expand(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|e| {
        Error::config_invalid_value(CONFIG_ENV, Some(raw.to_string()), e.to_string())
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
