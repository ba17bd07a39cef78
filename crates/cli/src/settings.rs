//! Layered configuration for the `inflate` binary
//!
//! Sources, later ones winning: built-in defaults, an optional TOML file,
//! then `INFLATION_`-prefixed environment variables. Nested keys use a
//! double underscore, e.g. `INFLATION_PARAMS__NUM_WINNERS=25`.

use anyhow::{Context, Result};
use config::{Config, Environment, File as ConfigFile};
use ledger_inflation::InflationParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const ENV_PREFIX: &str = "INFLATION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// `pretty` or `json`.
    pub log_format: String,
    pub params: InflationParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            params: InflationParams::default(),
        }
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(config_path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                anyhow::bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            env.prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config
            .params
            .validate()
            .context("Invalid inflation parameters")?;
        Ok(config)
    }
}

pub fn init_logging(config: &AppConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    // Logs go to stderr so stdout stays machine-readable.
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}
