use billing_core::Tariff;
use serde::Deserialize;
use std::{fs, path::Path};

const CONFIG_ENV: &str = "DASHBOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "dashboard-config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub currency_symbol: String,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Session defaults for the tariff sidebar.
    pub tariff: Tariff,
    pub presentation: PresentationConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Reads `$DASHBOARD_CONFIG`, or `dashboard-config.toml` when the variable
    /// is unset. A missing default file means built-in defaults.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let cfg = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            Err(_) => {
                tracing::info!("no {DEFAULT_CONFIG_PATH} found, using built-in defaults");
                Self::default()
            }
        };
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.tariff
            .check()
            .map_err(|e| anyhow::anyhow!("invalid [tariff] defaults: {e}"))?;
        Ok(cfg)
    }
}
