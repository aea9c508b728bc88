pub mod handler;

use crate::{Clock, ClockArithmetic, Registry};
use chrono::{DateTime, Utc};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7777;

/// Everything a request handler reads. Cloned into every connection.
#[derive(Clone)]
pub struct ServiceContext {
    registry: Arc<Registry>,
    clock: Arc<dyn Clock>,
    arithmetic: ClockArithmetic,
}

impl ServiceContext {
    pub fn new<C>(registry: Registry, clock: C, arithmetic: ClockArithmetic) -> Self
    where
        C: Clock + 'static,
    {
        Self {
            registry: Arc::new(registry),
            clock: Arc::new(clock),
            arithmetic,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn arithmetic(&self) -> ClockArithmetic {
        self.arithmetic
    }
}

pub async fn server(ctx: ServiceContext, host: &str, port: Option<u16>) -> ServeResult<()> {
    let addr: SocketAddr = format!("{}:{}", host, port.unwrap_or(DEFAULT_PORT))
        .parse()
        .map_err(|e| ServeError::AddressParseError(format!("{e}")))?;
    let listener = TcpListener::bind(addr).await?;

    log::info!("tzdiff server listening at [{}]", addr);
    serve(listener, ctx, shutdown_signal()).await
}

/// Accepts connections on `listener` until `shutdown` completes. Each
/// connection is served on its own task.
pub async fn serve<F>(listener: TcpListener, ctx: ServiceContext, shutdown: F) -> ServeResult<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        let (stream, remote_addr) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = &mut shutdown => {
                log::info!("tzdiff server shutting down");
                return Ok(());
            }
        };

        let ctx = ctx.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req| handler::route(ctx.clone(), req));
            let http_server = Builder::new(TokioExecutor::new());
            if let Err(e) = http_server
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                log::debug!("connection from {remote_addr} closed with error: {e}");
            }
        });
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c. {e}");
    }
}

pub type ServeResult<T> = std::result::Result<T, ServeError>;
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("address parse error: {0}")]
    AddressParseError(String),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}
