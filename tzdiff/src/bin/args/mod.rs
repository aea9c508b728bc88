use ::tzdiff::{config::*, server::DEFAULT_HOST, ClockArithmetic};

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Parser, Debug, Default)]
#[clap(author, version, about)]
pub struct Args {
    #[clap(long = "host", env = "TZDIFF_HOST", help = "address to listen on. default: 0.0.0.0")]
    pub host: Option<String>,

    #[clap(
        long = "port",
        short = 'p',
        env = "TZDIFF_PORT",
        help = "port to listen on. default: 7777"
    )]
    pub port: Option<u16>,

    #[clap(
        long = "arithmetic",
        help = "how offsets are added onto the clock {flat,minute_carrying}. default: flat"
    )]
    pub arithmetic: Option<ClockArithmetic>,

    #[clap(
        long = "config",
        short,
        help = "config file path. Read ~/.config/tzdiff/config.toml by default if it exists."
    )]
    config: Option<PathBuf>,
}

impl Args {
    // values given on the command line win over the config file
    fn merge_with_config(&mut self, config: Config) {
        if self.host.is_none() {
            self.host = config.host;
        }

        if self.port.is_none() {
            self.port = config.port;
        }

        if self.arithmetic.is_none() {
            self.arithmetic = config.arithmetic;
        }
    }

    pub fn init(&mut self, load_default_config: bool) -> Result<()> {
        if let Some(config_path) = &self.config {
            let config = Config::read(config_path.as_path())?;
            self.merge_with_config(config);
        } else if load_default_config {
            if let Some(config) = Config::try_load_default() {
                log::info!("loading default config");
                self.merge_with_config(config);
            }
        }
        Ok(())
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn arithmetic(&self) -> ClockArithmetic {
        self.arithmetic.unwrap_or_default()
    }
}

#[derive(Error, Debug)]
pub enum ArgsError {
    #[error("config error. {0}")]
    ConfigError(#[from] ConfigError),
}

type Result<T> = std::result::Result<T, ArgsError>;
