//! sitedrop HTTP front end
//!
//! Wires the core services to real provider clients and exposes them on a
//! single Actix-web endpoint. The binary in `main.rs` only loads
//! configuration and starts the server.

pub mod adapters;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod state;

pub use handlers::configure;
pub use state::AppState;
