//! Wires the repository, ISO 8583 client, and HTTP router into a runnable
//! acquirer process.

use crate::api::{self, AppState};
use crate::config::Config;
use crate::iso8583_client::Iso8583ClientImpl;
use crate::repository::InMemoryRepository;
use crate::service::Service;
use std::io;
use std::sync::Arc;
use tracing::info;

/// A fully wired acquirer, ready to [`App::run`].
pub struct App {
    config: Config,
    state: AppState<InMemoryRepository, Iso8583ClientImpl>,
}

impl App {
    /// Build an acquirer app with an in-memory repository and a real ISO
    /// 8583 connection to the issuer named in `config`.
    pub async fn new(config: Config) -> io::Result<Self> {
        let repo = Arc::new(InMemoryRepository::new());
        let client = Arc::new(
            Iso8583ClientImpl::connect_with_timeout(&config.iso8583_addr, config.send_timeout)
                .await
                .map_err(io::Error::other)?,
        );
        let service = Arc::new(Service::new(repo, client));
        Ok(Self {
            config,
            state: AppState::new(service),
        })
    }

    /// Run the HTTP API until it fails or the process is shut down.
    pub async fn run(self) -> io::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.http_addr).await?;
        info!(addr = %self.config.http_addr, "acquirer http api listening");
        axum::serve(listener, api::router(self.state)).await
    }
}
