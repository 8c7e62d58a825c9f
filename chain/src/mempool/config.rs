use std::path::Path;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// [`ActPoolConfig`] sets the occupancy limits of the action pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ActPoolConfig {
    /// Maximum number of actions held across all accounts.
    pub capacity: usize,
    /// Maximum number of actions held for a single account.
    pub max_acts_per_account: usize,
}

impl Default for ActPoolConfig {
    fn default() -> Self {
        Self {
            capacity: 32_000,
            max_acts_per_account: 100,
        }
    }
}

impl ActPoolConfig {
    /// [`from_path`] creates an [`ActPoolConfig`] from a .toml file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path.as_ref().to_str().unwrap()))
            .add_source(
                Environment::with_prefix("ACTPOOL")
                    .keep_prefix(true)
                    .separator("__"),
            )
            .build()?;

        config.get::<Self>("actpool").map_err(anyhow::Error::msg)
    }
}
