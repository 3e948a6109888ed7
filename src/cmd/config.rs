//! Configuration view and validation commands: `landreg config`.

use anyhow::Result;

use landreg::config::{LandregConfig, LandregToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &LandregConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = &config.path;

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Landreg Configuration");
            println!("=====================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No landreg.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let toml = &config.toml;
            println!("[api]");
            println!("  base_url = \"{}\"", toml.api.base_url);
            println!("  agents_path = \"{}\"", toml.api.agents_path);
            println!("  timeout_secs = {}", toml.api.timeout_secs);
            println!();

            if let Some(dir) = &toml.storage.dir {
                println!("[storage]");
                println!("  dir = \"{}\"", dir.display());
                println!();
            }

            println!("[ui]");
            println!("  locale = \"{}\"", toml.ui.locale);
            println!();

            println!("[logging]");
            println!("  filter = \"{}\"", toml.logging.filter);
            println!("  json = {}", toml.logging.json);
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  base_url = \"{}\"", config.base_url);
            println!("  locale = \"{}\"", config.locale);
            println!("  storage_dir = \"{}\"", config.storage_dir.display());
            println!();

            if !config_path.exists() {
                println!("Run 'landreg config init' to create a landreg.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            let warnings = config.validate();
            if warnings.is_empty() {
                if config_path.exists() {
                    println!("Configuration is valid.");
                } else {
                    println!("No landreg.toml found. Using defaults (valid).");
                }
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("landreg.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            LandregToml::default().save(config_path)?;

            println!("Created landreg.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [api] base_url, agents_path, timeout_secs");
            println!("  - [storage] dir");
            println!("  - [ui] locale (en or fr)");
            println!("  - [logging] filter, json");
            println!();
        }
    }

    Ok(())
}
