//! Issuer process configuration.

/// Addresses and transport tuning for a running issuer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP account/card/transaction API binds to.
    pub http_addr: String,
    /// Address the ISO 8583 server binds to.
    pub iso8583_addr: String,
    /// Ceiling on a single framed ISO 8583 message.
    pub max_frame_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:9090".to_string(),
            iso8583_addr: "127.0.0.1:8583".to_string(),
            max_frame_bytes: iso8583::net::frame::DEFAULT_MAX_FRAME_BYTES,
        }
    }
}
