//! Framed TCP transport and connection client/server for ISO 8583 messages.

pub mod client;
pub mod frame;
pub mod server;
pub mod stan;

pub use client::Client;
pub use server::{InboundHandler, Server};
pub use stan::StanGenerator;
