//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Result};

use pubtag_core::Config;

use crate::output::Output;

/// Show the current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;

    if output.is_quiet() {
        println!("{}", config.snapshot_path().display());
        return Ok(());
    }

    println!("Config file:    {}", Config::config_file_path().display());
    println!("Data directory: {}", config.data_dir.display());
    println!("Snapshot:       {}", config.snapshot_path().display());
    match &config.collection_dir {
        Some(dir) => println!("Collection:     {}", dir.display()),
        None => println!("Collection:     <not set>"),
    }
    Ok(())
}

/// Set a configuration value and save the config file
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load()?;

    match key.as_str() {
        "data_dir" => config.data_dir = PathBuf::from(value),
        "collection_dir" => {
            config.collection_dir = if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            };
        }
        _ => bail!("unknown configuration key: {} (data_dir, collection_dir)", key),
    }

    config.save()?;
    output.message("Configuration saved.");
    Ok(())
}
