use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::scrape::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Ordered list of pages to harvest. The harvest cycle processes
    /// them strictly in this order.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("event-harvester");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("events.db").to_string_lossy().to_string()
}

fn default_sources() -> Vec<String> {
    [
        "https://lovin.ie/",
        "https://www.alternativedublincity.com/",
        "https://charfoodguide.com/category/dublins-food-and-drink-culture-explored/",
        "https://www.totallydublin.ie/",
        "https://districtmagazine.ie/",
        "https://www.bordgaisenergytheatre.ie/",
        "https://www.3olympia.ie/",
        "https://www.theacademydublin.com/",
        "https://www.whelanslive.com/events/",
        "https://imma.ie/",
        "https://www.nationalgallery.ie/art-and-artists/exhibitions/",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            sources: default_sources(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("event-harvester")
            .join("config.toml")
    }
}
