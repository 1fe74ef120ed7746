//! CLI configuration
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. `satsplit.toml` in the working directory (optional)
//! 3. the file passed with `--config`
//! 4. `SATSPLIT_*` environment variables (`.env` is loaded first)
//!
//! Command-line flags override all of these.

use std::path::Path;

use anyhow::Context;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use satsplit_clearing::MatchStrategy;
use satsplit_types::Denomination;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatsplitConfig {
    /// Unit used when neither `--unit` nor a member preference applies
    #[serde(default)]
    pub display_unit: Denomination,
    /// Matching strategy used by `settle`
    #[serde(default)]
    pub strategy: MatchStrategy,
    /// Fallback tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SatsplitConfig {
    fn default() -> Self {
        Self {
            display_unit: Denomination::default(),
            strategy: MatchStrategy::default(),
            log_level: default_log_level(),
        }
    }
}

impl SatsplitConfig {
    /// Load configuration from files and environment
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(File::with_name("satsplit").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("SATSPLIT").try_parsing(true));

        Self::build(builder).with_context(|| match config_path {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "failed to load configuration".to_string(),
        })
    }

    /// Parse configuration from TOML text alone
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Self::build(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<config::builder::DefaultState>) -> anyhow::Result<Self> {
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}
