use std::time::Duration;

use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{CONFIG_PATH_VAR, find_config_file, read_config};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

use crate::view::SortField;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    backend: Backend,
    shop: Shop,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Backend {
    base_url: String,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Shop {
    confirmation_delay_ms: u64,
    default_sort: SortField,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:3000"),
            timeout_secs: 10,
        }
    }
}

impl Default for Shop {
    fn default() -> Self {
        Self {
            confirmation_delay_ms: 2500,
            default_sort: SortField::Subject,
        }
    }
}

impl Config {
    /// Loads the configuration once per process. A missing file is not an
    /// error, defaults are used instead.
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                match Self::load(use_local) {
                    Ok(c) => c,
                    Err(ConfigError::ConfigNotFound) => {
                        tracing::debug!("config not found, using defaults");
                        Config::default()
                    }
                    Err(e) => {
                        crate::error::log_error(&e);
                        tracing::warn!("falling back to default config");
                        Config::default()
                    }
                }
            })
            .await
    }

    pub fn load(use_local: bool) -> ConfigResult<Self> {
        let bytes = read_config(use_local)?;
        let config: Self = toml::from_slice(&bytes)?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(s)?)
    }

    #[inline]
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    #[inline]
    pub fn shop(&self) -> &Shop {
        &self.shop
    }
}

impl Backend {
    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Shop {
    #[inline]
    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }

    #[inline]
    pub fn default_sort(&self) -> SortField {
        self.default_sort
    }
}
