//! A minimal concurrent static-file HTTP server.
//!
//! One task per accepted connection, a single bounded read per request,
//! and a fixed URI-to-file mapping under a configured document root.
//! Graceful shutdown stops new accepts and lets in-flight connections
//! finish.

pub mod config;
pub mod logger;
pub mod request;
pub mod responder;
pub mod response;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use logger::Logger;
pub use request::{MalformedRequest, Request};
pub use response::Response;
pub use server::{shutdown_signal, Server, ShutdownHandle};
