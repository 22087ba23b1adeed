use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use item_input::defaults::{self, Defaults, ItemInputConfig};
use item_input::paths;

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Display configuration (merged defaults + file)
    Show {
        /// Show only built-in defaults (ignore item-input.json)
        #[arg(long, conflicts_with = "file")]
        builtin: bool,

        /// Read this file instead of the configured location; errors are reported
        #[arg(long, value_name = "PATH")]
        file: Option<String>,
    },
    /// Show the path to item-input.json
    Path,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ItemInputConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    defaults: Option<Defaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
}

impl ConfigOutput {
    fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            config: None,
            defaults: None,
            path: None,
            exists: None,
        }
    }
}

pub fn run(args: ConfigArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ConfigOutput> {
    match args.command {
        ConfigCommand::Show { builtin, file } => show(builtin, file.as_deref()),
        ConfigCommand::Path => path(),
    }
}

fn show(builtin: bool, file: Option<&str>) -> CmdResult<ConfigOutput> {
    let mut output = ConfigOutput::new("config.show");
    if builtin {
        output.defaults = Some(defaults::builtin_defaults());
        return Ok((output, 0));
    }

    match file {
        Some(raw) => {
            let path: PathBuf = paths::expand(raw)?;
            output.config = Some(defaults::load_config_from_path(&path)?);
            output.path = Some(path.display().to_string());
        }
        None => output.config = Some(defaults::load_config()),
    }
    Ok((output, 0))
}

fn path() -> CmdResult<ConfigOutput> {
    let path = paths::config_json()?;
    let mut output = ConfigOutput::new("config.path");
    output.exists = Some(defaults::config_exists());
    output.path = Some(path.display().to_string());
    Ok((output, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_builtin_lists_defaults_only() {
        let (output, code) = show(true, None).unwrap();
        assert_eq!(code, 0);
        let json = serde_json::to_value(output).unwrap();
        assert_eq!(json["command"], "config.show");
        assert_eq!(json["defaults"]["max_item_value_length"], 60);
        assert!(json.get("config").is_none());
    }

    #[test]
    fn show_file_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-input.json");
        std::fs::write(&path, r#"{"defaults": {"json_indent": 2}}"#).unwrap();

        let (output, _) = show(false, path.to_str()).unwrap();
        assert_eq!(output.config.unwrap().defaults.json_indent, 2);
    }

    #[test]
    fn show_file_reports_broken_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item-input.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = show(false, path.to_str()).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }
}
