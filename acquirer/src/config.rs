//! Acquirer process configuration.

use std::time::Duration;

/// Addresses and transport tuning for a running acquirer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP merchant/payment API binds to.
    pub http_addr: String,
    /// Address of the issuer's ISO 8583 server.
    pub iso8583_addr: String,
    /// How long to wait for a 0110 reply before failing with `SendTimeout`.
    pub send_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8080".to_string(),
            iso8583_addr: "127.0.0.1:8583".to_string(),
            send_timeout: Duration::from_secs(5),
        }
    }
}
