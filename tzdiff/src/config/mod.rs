use crate::ClockArithmetic;
use dirs::home_dir;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("no such config file. {0}")]
    NoSuchConfigFile(String),
}

#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub arithmetic: Option<ClockArithmetic>,
}

impl Config {
    pub fn try_load_default() -> Option<Self> {
        default_config_path()
            .as_ref()
            .and_then(|f| match Self::read(f) {
                Err(_) => None,
                Ok(c) => Some(c),
            })
    }

    pub fn read(config_path: &Path) -> Result<Self> {
        if config_path.exists() && config_path.is_file() {
            let config_file_contents = fs::read_to_string(config_path)?;
            Self::read_str(config_file_contents.as_ref())
        } else {
            Err(ConfigError::NoSuchConfigFile(
                config_path.display().to_string(),
            ))
        }
    }

    pub fn read_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    let dir = home_dir();
    dir.map(|mut d| {
        d.push(".config/tzdiff/config.toml");
        d
    })
}
