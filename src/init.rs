use crate::config::Config;
use anyhow::{Result, bail};
use std::{fs, path::Path};

/// Writes a starter config with placeholder credentials.
pub fn init_config(filename: &str) -> Result<()> {
    let config_filename = if filename.ends_with(".toml") {
        filename.to_string()
    } else {
        format!("{}.toml", filename)
    };
    if Path::new(&config_filename).exists() {
        bail!("{} already exists, refusing to overwrite it", config_filename);
    }

    let template = Config::new("Tu nombre", "secret_xxx", "00000000000000000000000000000000");
    fs::write(&config_filename, toml::to_string_pretty(&template)?)?;
    println!("Created config file: {}", config_filename);
    Ok(())
}
