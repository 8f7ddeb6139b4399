mod types;

pub use types::{Config, DatabaseConfig, GraphqlConfig, ServerConfig, StoreBackend};

use crate::error::{HackernewsError, Result};
use std::fs;
use std::path::Path;

/// Prefix for environment overrides, e.g. `HACKERNEWS__SERVER__PORT=5000`
pub const ENV_PREFIX: &str = "HACKERNEWS";

/// Load configuration from a TOML file, layering environment overrides on top
pub fn load_config(path: &str) -> Result<Config> {
    load_config_with_prefix(path, ENV_PREFIX)
}

fn load_config_with_prefix(path: &str, env_prefix: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        return Err(HackernewsError::Config(format!(
            "Failed to read config file '{}': file not found",
            path
        )));
    }

    let settings = ::config::Config::builder()
        .add_source(::config::File::new(path, ::config::FileFormat::Toml))
        .add_source(
            ::config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = settings.try_deserialize()?;

    config.validate().map_err(HackernewsError::Config)?;

    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &Config, path: &str) -> Result<()> {
    config.validate().map_err(HackernewsError::Config)?;

    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)
        .map_err(|e| HackernewsError::Config(format!("Failed to write config file '{}': {}", path, e)))?;

    Ok(())
}
