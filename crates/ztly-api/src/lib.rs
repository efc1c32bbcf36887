// ztly-api: Async Rust client for the ZeroTier network controller API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ControllerApi;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
