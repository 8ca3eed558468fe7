use std::path::PathBuf;

use color_eyre::eyre::Result;
use serde::Deserialize;

use crate::{
    core::config::{AccumulatorConfig, ScrollConfig},
    utils,
};

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// Settings of the simulated catalog served by the demo binary
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_catalog_size")]
    pub catalog_size: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub latency_ms: u64,
    /// Fail every n-th fetch call, 0 disables failures
    #[serde(default)]
    pub fail_every: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            catalog_size: default_catalog_size(),
            page_size: default_page_size(),
            latency_ms: 0,
            fail_every: 0,
        }
    }
}

fn default_catalog_size() -> usize {
    120
}

fn default_page_size() -> usize {
    25
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub pagination: AccumulatorConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

impl Config {
    /// Load the embedded defaults, overridden by any config file in the config directory
    pub fn new() -> Result<Self> {
        let data_dir = utils::get_data_dir();
        let config_dir = utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("_config_dir", config_dir.to_string_lossy().into_owned())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
            }
            builder = builder.add_source(config::File::from(path).format(*format).required(false));
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// The configuration embedded in the binary, without user overrides
    pub fn embedded() -> Result<Self> {
        let cfg: Self = json5::from_str(CONFIG)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.pagination.validate()?;
        self.scroll.validate()?;
        Ok(())
    }
}
