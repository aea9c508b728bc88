mod args;

use ::tzdiff::{server, Registry, RegistryError, SystemClock};
use args::*;
use clap::Parser;
use dotenv::dotenv;
use std::io;
use thiserror::Error;
use tracing_subscriber::filter::EnvFilter;

#[derive(Error, Debug)]
pub enum TzdiffBinError {
    #[error("args error {0}")]
    ArgsError(#[from] ArgsError),

    #[error("registry error {0}")]
    RegistryError(#[from] RegistryError),

    #[error("serve error {0}")]
    ServeError(#[from] server::ServeError),

    #[error("failed to init logger {0}")]
    LoggerError(String),
}

pub type Result<T> = std::result::Result<T, TzdiffBinError>;

fn init_logger() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let sub = tracing_subscriber::FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(sub)
        .map_err(|e| TzdiffBinError::LoggerError(e.to_string()))?;
    tracing_log::LogTracer::init().map_err(|e| TzdiffBinError::LoggerError(e.to_string()))?;
    Ok(())
}

#[tokio::main]
pub async fn main() -> Result<()> {
    dotenv().ok();
    init_logger()?;

    let mut args = Args::parse();
    args.init(true)?;

    let registry = Registry::common()?;
    for (key, timezone) in registry.list_all() {
        log::info!("key: {key} value: {timezone:?}");
    }

    let ctx = server::ServiceContext::new(registry, SystemClock, args.arithmetic());
    server::server(ctx, args.host(), args.port).await?;
    Ok(())
}
