//! Wires the repository, service, HTTP router, and ISO 8583 server into a
//! runnable issuer process.

use crate::api::{self, AppState};
use crate::config::Config;
use crate::iso8583_handler::AuthorizationHandler;
use crate::repository::InMemoryRepository;
use crate::service::Service;
use iso8583::net::Server;
use std::io;
use std::sync::Arc;
use tracing::info;

/// A fully wired issuer, ready to [`App::run`].
pub struct App {
    config: Config,
    state: AppState<InMemoryRepository>,
}

impl App {
    /// Build an issuer app with an in-memory repository.
    pub fn new(config: Config) -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        let service = Arc::new(Service::new(repo));
        Self {
            config,
            state: AppState::new(service),
        }
    }

    /// Run the HTTP API and ISO 8583 server concurrently until either
    /// fails. Returns only on error or process shutdown.
    pub async fn run(self) -> io::Result<()> {
        let handler = Arc::new(AuthorizationHandler::new(self.state.service().clone()));
        let iso_server = Server::bind(&self.config.iso8583_addr, handler)
            .await
            .map_err(io::Error::other)?
            .with_max_frame_bytes(self.config.max_frame_bytes);

        let http_listener = tokio::net::TcpListener::bind(&self.config.http_addr).await?;
        info!(addr = %self.config.http_addr, "issuer http api listening");
        let router = api::router(self.state);

        tokio::try_join!(
            async { iso_server.run().await.map_err(io::Error::other) },
            async { axum::serve(http_listener, router).await },
        )?;

        Ok(())
    }
}
