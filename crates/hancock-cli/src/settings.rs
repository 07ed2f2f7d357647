use std::{
    fs,
    path::{Path, PathBuf},
};

use hancock_key::KeyConfig;
use hancock_pki::PkiConfig;
use serde::Deserialize;

use crate::error::CliResult;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageCfg,
    pub log: LogCfg,
    pub keys: KeyConfig,
    pub pki: PkiConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageCfg {
    /// Keys go under `keys/`, certificates under `certs/`
    pub data_dir: PathBuf,
}

impl Default for StorageCfg {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogCfg {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogCfg {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file. A missing file yields defaults.
    pub fn load(config_path: &Path) -> CliResult<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(config_path)?;
        Ok(toml::from_str(&content)?)
    }
}
