//! TCP client with request/response correlation by STAN.

use crate::error::{Iso8583Error, Result};
use crate::field::Field;
use crate::message::Message;
use crate::net::frame::{self, DEFAULT_MAX_FRAME_BYTES};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, warn};

const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

type PendingTable = Arc<Mutex<HashMap<String, oneshot::Sender<Message>>>>;

/// A connected ISO 8583 client: sends requests and correlates replies to
/// them by STAN, independent of arrival order.
pub struct Client {
    write_half: Arc<Mutex<OwnedWriteHalf>>,
    pending: PendingTable,
    send_timeout: Duration,
    max_frame_bytes: usize,
}

impl Client {
    /// Connect to `addr` and start the background read loop.
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| Iso8583Error::Io(e.to_string()))?;
        let (read_half, write_half) = stream.into_split();

        let pending: PendingTable = Arc::new(Mutex::new(HashMap::new()));
        let max_frame_bytes = DEFAULT_MAX_FRAME_BYTES;

        tokio::spawn(read_loop(read_half, pending.clone(), max_frame_bytes));

        Ok(Self {
            write_half: Arc::new(Mutex::new(write_half)),
            pending,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            max_frame_bytes,
        })
    }

    /// Override the send timeout (default 5 seconds).
    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    /// Send `request` and wait for its correlated reply, per the request's
    /// STAN (field 11). Fails with [`Iso8583Error::SendTimeout`] if no
    /// reply arrives within the configured window.
    pub async fn send(&self, request: &Message) -> Result<Message> {
        let stan = request
            .field(Field::Stan)
            .and_then(|v| v.as_str())
            .ok_or(Iso8583Error::FieldNotPresent(Field::Stan.number()))?
            .to_string();

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(stan.clone(), tx);
        }

        {
            let mut write_half = self.write_half.lock().await;
            if let Err(e) = frame::write_frame(&mut *write_half, &request.pack()).await {
                self.pending.lock().await.remove(&stan);
                return Err(e);
            }
        }

        match timeout(self.send_timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => {
                self.pending.lock().await.remove(&stan);
                Err(Iso8583Error::TransportClosed(
                    "reply slot dropped before delivery".to_string(),
                ))
            }
            Err(_) => {
                self.pending.lock().await.remove(&stan);
                Err(Iso8583Error::SendTimeout(stan))
            }
        }
    }

    /// Close the write half of the connection.
    pub async fn close(&self) -> Result<()> {
        self.write_half
            .lock()
            .await
            .shutdown()
            .await
            .map_err(|e| Iso8583Error::Io(e.to_string()))
    }
}

async fn read_loop(mut read_half: OwnedReadHalf, pending: PendingTable, max_frame_bytes: usize) {
    loop {
        let body = match frame::read_frame(&mut read_half, max_frame_bytes).await {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "client read loop ending");
                return;
            }
        };

        let message = match Message::unpack(&body) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "dropping malformed inbound message");
                continue;
            }
        };

        let stan = message.field(Field::Stan).and_then(|v| v.as_str());
        let Some(stan) = stan else {
            warn!("dropping inbound message without a STAN");
            continue;
        };

        let waiter = pending.lock().await.remove(stan);
        match waiter {
            Some(tx) => {
                let _ = tx.send(message);
            }
            None => {
                warn!(stan, "dropping reply for unknown or already-delivered STAN");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::mti::Mti;
    use crate::net::frame::DEFAULT_MAX_FRAME_BYTES;
    use tokio::net::TcpListener;

    fn request_message(stan: &str) -> Message {
        Message::builder(Mti::AUTHORIZATION_REQUEST)
            .field(Field::Pan, "4242424242424242")
            .field(Field::Amount, "001000")
            .field(Field::TransmissionDateTime, "2024-08-12T16:01:40Z")
            .field(Field::Currency, "840")
            .field(Field::Cvv, "7890")
            .field(Field::Expiration, "2512")
            .field(Field::AcceptorInformation, "")
            .field(Field::Stan, stan)
            .build()
            .unwrap()
    }

    fn response_message(stan: &str) -> Message {
        Message::builder(Mti::AUTHORIZATION_RESPONSE)
            .field(Field::ApprovalCode, "00")
            .field(Field::Stan, stan)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_reply_for_unknown_stan_is_dropped_legitimate_reply_still_delivers() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _request_bytes = frame::read_frame(&mut stream, DEFAULT_MAX_FRAME_BYTES)
                .await
                .unwrap();

            // An unsolicited reply for a STAN nobody is waiting on, ahead of
            // the legitimate one.
            frame::write_frame(&mut stream, &response_message("999999").pack())
                .await
                .unwrap();
            frame::write_frame(&mut stream, &response_message("000042").pack())
                .await
                .unwrap();
        });

        let client = Client::connect(&addr.to_string()).await.unwrap();
        let reply = client.send(&request_message("000042")).await.unwrap();

        assert_eq!(reply.field(Field::Stan).unwrap().as_str(), Some("000042"));
    }
}
