//! TCP server accepting framed ISO 8583 connections and dispatching
//! inbound requests to a pluggable handler.

use crate::error::{Iso8583Error, Result};
use crate::message::Message;
use crate::net::frame::{self, DEFAULT_MAX_FRAME_BYTES};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Handles an inbound request and produces the reply to write back, if
/// any. Implemented by the issuer's authorization core; the transport
/// layer never inspects message semantics itself.
#[async_trait]
pub trait InboundHandler: Send + Sync {
    /// Handle one inbound message and return the reply to send, if this
    /// MTI warrants one.
    async fn handle(&self, request: Message) -> Option<Message>;
}

/// A running ISO 8583 server.
pub struct Server {
    listener: TcpListener,
    handler: Arc<dyn InboundHandler>,
    max_frame_bytes: usize,
}

impl Server {
    /// Bind a server on `addr` with the given inbound handler.
    pub async fn bind(addr: &str, handler: Arc<dyn InboundHandler>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| Iso8583Error::Io(e.to_string()))?;
        info!(%addr, "iso8583 server listening");
        Ok(Self {
            listener,
            handler,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
        })
    }

    /// Override the per-frame length ceiling.
    pub fn with_max_frame_bytes(mut self, max_frame_bytes: usize) -> Self {
        self.max_frame_bytes = max_frame_bytes;
        self
    }

    /// The address this server actually bound to, useful when `addr` asked
    /// for an OS-assigned ephemeral port.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener
            .local_addr()
            .map_err(|e| Iso8583Error::Io(e.to_string()))
    }

    /// Accept connections forever, spawning one task per connection. Each
    /// connection's requests are handled synchronously in arrival order,
    /// per the framed read loop's single-reader invariant.
    pub async fn run(self) -> Result<()> {
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .map_err(|e| Iso8583Error::Io(e.to_string()))?;
            debug!(%peer, "accepted connection");

            let handler = self.handler.clone();
            let max_frame_bytes = self.max_frame_bytes;
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, handler, max_frame_bytes).await {
                    warn!(%peer, error = %e, "connection closed");
                }
            });
        }
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    handler: Arc<dyn InboundHandler>,
    max_frame_bytes: usize,
) -> Result<()> {
    loop {
        let body = match frame::read_frame(&mut stream, max_frame_bytes).await {
            Ok(body) => body,
            Err(Iso8583Error::TransportClosed(reason)) => {
                debug!(reason, "connection closed by peer");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let request = match Message::unpack(&body) {
            Ok(msg) => msg,
            Err(e) => {
                error!(error = %e, "rejecting malformed message, closing connection");
                return Err(e);
            }
        };

        if let Some(reply) = handler.handle(request).await {
            frame::write_frame(&mut stream, &reply.pack()).await?;
        }
    }
}
