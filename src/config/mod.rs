pub mod gameplay;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use gameplay::{AudioConfig, GameplayConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gameplay: GameplayConfig,
    pub audio: AudioConfig,
}

impl Config {
    /// Loads the config file, falling back to defaults when it cannot be read.
    #[must_use]
    pub fn load_or_default() -> Self {
        match loader::load_config_from_file() {
            Ok(config) => {
                log::info!("Configuration loaded successfully");
                config
            }
            Err(e) => {
                log::error!("Failed to load configuration: {e}");
                Self::default()
            }
        }
    }
}
