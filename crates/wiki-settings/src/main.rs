//! Entry point for the wiki site settings admin tool.
//!
//! Reads and edits the wiki's site settings record directly in its storage
//! directory, using the same JSON contract as the wiki itself.
//!
//! # Usage
//!
//! ```text
//! wiki-settings [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show         Print the stored record as JSON
//!   get          Print one setting
//!   set          Change one setting
//!   reset        Replace the record with the defaults
//!   file-types   Print the allowed upload extensions, one per line
//!   theme-path   Print the current theme directory
//!   import       Load a JSON file and store it as the record
//!   fields       List the setting names
//!   id           Print the storage key of the record
//!   init-config  Write a default config file
//!
//! Options:
//!   --config   <PATH>   Config file [default: platform config dir]
//!   --data-dir <PATH>   Directory holding the record (overrides the config)
//!   --log-level <LEVEL> Log filter (overrides the config)
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                 | Flag          |
//! |--------------------------|---------------|
//! | `WIKI_SETTINGS_CONFIG`   | `--config`    |
//! | `WIKI_SETTINGS_DATA_DIR` | `--data-dir`  |
//! | `WIKI_SETTINGS_LOG`      | `--log-level` |
//!
//! `RUST_LOG`, when set, takes precedence over both the flag and the config.
//! Log output goes to stderr so `show` can be piped.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wiki_core::SITE_SETTINGS_ID;
use wiki_settings::application::manage_settings::{SettingField, SettingsService, SettingsStore};
use wiki_settings::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, ToolConfig,
};
use wiki_settings::infrastructure::storage::FileSettingsStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Wiki site settings admin tool.
#[derive(Debug, Parser)]
#[command(
    name = "wiki-settings",
    about = "Inspect and edit the wiki's site settings record",
    version
)]
struct Cli {
    /// Path of the tool's TOML config file.
    #[arg(long, env = "WIKI_SETTINGS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the settings record.
    #[arg(long, env = "WIKI_SETTINGS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `debug`.
    #[arg(long, env = "WIKI_SETTINGS_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, PartialEq)]
enum Command {
    #[command(flatten)]
    Settings(SettingsCommand),
    /// Write a default config file to the config path.
    InitConfig,
}

/// Commands that read or write the settings record.
#[derive(Debug, Subcommand, PartialEq)]
enum SettingsCommand {
    /// Print the stored record as JSON.
    Show,
    /// Print one setting.
    Get { field: String },
    /// Change one setting.
    Set { field: String, value: String },
    /// Replace the record with the defaults.
    Reset,
    /// Print the allowed upload extensions, one per line.
    FileTypes,
    /// Print the current theme directory.
    ThemePath,
    /// Load a JSON file and store it as the record.
    Import { path: PathBuf },
    /// List the setting names.
    Fields,
    /// Print the storage key of the record.
    Id,
}

impl Cli {
    /// Config file path: `--config`, else the platform default.
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path().context("no --config given"),
        }
    }

    /// Applies the command-line overrides on top of the file config.
    fn merge_into(&self, mut config: ToolConfig) -> ToolConfig {
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

/// Runs `command` against `service` and returns the text to print.
fn execute<S: SettingsStore>(
    command: &SettingsCommand,
    service: &SettingsService<S>,
) -> anyhow::Result<String> {
    let output = match command {
        SettingsCommand::Show => service.load()?.to_json()?,
        SettingsCommand::Get { field } => service.get(field.parse()?)?,
        SettingsCommand::Set { field, value } => {
            let field: SettingField = field.parse()?;
            let mut settings = service.update(field, value)?;
            format!("{field} = {}", field.read(&mut settings, service.log()))
        }
        SettingsCommand::Reset => service.reset()?.to_json()?,
        SettingsCommand::FileTypes => service.load()?.allowed_file_types_list().join("\n"),
        SettingsCommand::ThemePath => service.load()?.theme_path(),
        SettingsCommand::Import { path } => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            service.import(&json)?.to_json()?
        }
        SettingsCommand::Fields => SettingField::ALL
            .into_iter()
            .map(|f| {
                if f.is_derived() {
                    format!("{f} (derived)")
                } else {
                    f.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        SettingsCommand::Id => SITE_SETTINGS_ID.to_string(),
    };
    Ok(output)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = match &cli.command {
        Command::InitConfig => return init_config(&cli),
        Command::Settings(command) => command,
    };

    let config_path = cli.config_path();
    let file_config = match &config_path {
        Ok(path) => load_config_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        Err(_) => ToolConfig::default(),
    };
    let config = cli.merge_into(file_config);

    // `RUST_LOG` wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    debug!("using settings directory {}", config.storage.data_dir.display());

    let service = SettingsService::new(FileSettingsStore::new(&config.storage.data_dir));
    let output = execute(command, &service)?;
    println!("{output}");
    Ok(())
}

/// Writes the default config, with any command-line overrides, and prints
/// its path.
fn init_config(cli: &Cli) -> anyhow::Result<()> {
    let path = cli.config_path()?;
    let config = cli.merge_into(ToolConfig::default());
    save_config_to(&path, &config)
        .with_context(|| format!("writing config to {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiki_settings::infrastructure::storage::InMemorySettingsStore;

    fn service() -> SettingsService<InMemorySettingsStore> {
        SettingsService::new(InMemorySettingsStore::new())
    }

    #[test]
    fn test_cli_parses_set_command() {
        let cli = Cli::parse_from(["wiki-settings", "set", "site_name", "Team wiki"]);

        assert_eq!(
            cli.command,
            Command::Settings(SettingsCommand::Set {
                field: "site_name".to_string(),
                value: "Team wiki".to_string(),
            })
        );
    }

    #[test]
    fn test_cli_parses_init_config_apart_from_settings_commands() {
        let init = Cli::parse_from(["wiki-settings", "init-config"]);
        let show = Cli::parse_from(["wiki-settings", "show"]);

        assert_eq!(init.command, Command::InitConfig);
        assert_eq!(show.command, Command::Settings(SettingsCommand::Show));
    }

    #[test]
    fn test_init_config_writes_overrides_to_explicit_path() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("wiki_settings_cli_{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");
        let path_arg = path.to_string_lossy().into_owned();
        let cli = Cli::parse_from([
            "wiki-settings",
            "--config",
            path_arg.as_str(),
            "--log-level",
            "debug",
            "init-config",
        ]);

        // Act
        init_config(&cli).unwrap();

        // Assert
        let written = load_config_from(&path).unwrap();
        assert_eq!(written.logging.level, "debug");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_cli_data_dir_override_replaces_config_value() {
        // Arrange
        let cli = Cli::parse_from(["wiki-settings", "--data-dir", "/tmp/wiki", "show"]);

        // Act
        let config = cli.merge_into(ToolConfig::default());

        // Assert
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/wiki"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_cli_log_level_override() {
        let cli = Cli::parse_from(["wiki-settings", "--log-level", "debug", "id"]);
        let config = cli.merge_into(ToolConfig::default());
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_cli_explicit_config_path_is_used() {
        let cli = Cli::parse_from(["wiki-settings", "--config", "/etc/wiki.toml", "show"]);
        assert_eq!(cli.config_path().unwrap(), PathBuf::from("/etc/wiki.toml"));
    }

    #[test]
    fn test_execute_show_prints_default_json_for_empty_store() {
        let output = execute(&SettingsCommand::Show, &service()).unwrap();

        assert!(output.contains("\"SiteName\": \"Your site\""));
        assert!(!output.contains("ThemePath"));
    }

    #[test]
    fn test_execute_set_then_get() {
        // Arrange
        let service = service();

        // Act
        let set_output = execute(
            &SettingsCommand::Set {
                field: "Theme".to_string(),
                value: "Blackbar".to_string(),
            },
            &service,
        )
        .unwrap();
        let path = execute(&SettingsCommand::ThemePath, &service).unwrap();

        // Assert
        assert_eq!(set_output, "Theme = Blackbar");
        assert_eq!(path, "~/Themes/Blackbar");
    }

    #[test]
    fn test_execute_file_types_one_per_line() {
        let output = execute(&SettingsCommand::FileTypes, &service()).unwrap();
        assert_eq!(output, "jpg\npng\ngif");
    }

    #[test]
    fn test_execute_get_unknown_field_fails() {
        let result = execute(
            &SettingsCommand::Get {
                field: "nonsense".to_string(),
            },
            &service(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_fields_marks_derived_views() {
        let output = execute(&SettingsCommand::Fields, &service()).unwrap();

        assert!(output.contains("SiteName\n"));
        assert!(output.contains("ThemePath (derived)"));
    }

    #[test]
    fn test_execute_id_prints_settings_key() {
        let output = execute(&SettingsCommand::Id, &service()).unwrap();
        assert_eq!(output, "b960e8e5-529f-4f7c-aee4-28eb23e13dbd");
    }
}
