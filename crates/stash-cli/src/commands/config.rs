//! Config command handlers

use anyhow::{bail, Context, Result};

use stash_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "database": config.database_path(),
                    "log_level": config.log_level(),
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:  {}", config.data_dir.display());
            println!("  log_level: {}", config.log_level());
            println!(
                "  log_file:  {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(stderr)".to_string())
            );
            println!();
            println!("Database:    {}", config.database_path().display());
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;
    let unset = value.is_empty() || value == "none";

    match key.as_str() {
        "data_dir" => {
            if unset {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.clone().into();
        }
        "log_level" => {
            config.log_level = if unset { None } else { Some(value.clone()) };
        }
        "log_file" => {
            config.log_file = if unset { None } else { Some(value.clone().into()) };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, log_level, log_file",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
