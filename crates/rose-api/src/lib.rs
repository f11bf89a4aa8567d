// rose-api: Async Rust client for the rose device's HTTP endpoints

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::RoseClient;
pub use error::Error;
pub use models::StatusResponse;
pub use transport::{TlsMode, TransportConfig};
