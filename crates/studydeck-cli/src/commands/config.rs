//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use studydeck_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "document_file": config.document_file,
                    "bind_addr": config.bind_addr,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.document_path().display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:      {}", config.data_dir.display());
            println!("  document_file: {}", config.document_file);
            println!("  bind_addr:     {}", config.bind_addr);
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    if value.trim().is_empty() {
        bail!("Value for '{}' must not be empty", key);
    }

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "document_file" => {
            config.document_file = value.clone();
        }
        "bind_addr" => {
            value
                .parse::<std::net::SocketAddr>()
                .with_context(|| format!("Invalid bind address: '{}'", value))?;
            config.bind_addr = value.clone();
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, document_file, bind_addr",
                key
            );
        }
    }

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
