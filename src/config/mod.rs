use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub icons_dir: PathBuf,
    pub manifest_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 3002,
                base_url: "http://localhost:3002".to_string(),
            },
            storage: StorageConfig {
                icons_dir: PathBuf::from("./icons"),
                manifest_path: PathBuf::from("./manifest.json"),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(&config_file, contents)?;
            default_config
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// `PORT` and `BASE_URL` take precedence over the config file.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.web.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid PORT environment variable: {}", port))?;
        }
        if let Ok(base_url) = std::env::var("BASE_URL") {
            self.web.base_url = base_url;
        }
        Ok(())
    }
}
