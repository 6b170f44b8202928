//! Cardholder-facing issuer: accounts, synthetic cards, and the ISO 8583
//! authorization core that turns a `0100` into a `0110`.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod iso8583_handler;
pub mod models;
pub mod repository;
pub mod service;

pub use app::App;
pub use config::Config;
pub use error::IssuerError;
