//! Network layer subsystem.
//!
//! Plaintext listeners are plain `tokio::net::TcpListener`s handed to axum;
//! this module only prepares the optional TLS configuration (rustls via
//! `axum-server`).

pub mod tls;
