//! ScamShield HTTP server.
//!
//! Transport layer over the scanning core:
//! - `POST /api/v1/scan` - multipart scan endpoint
//! - `GET /health` - liveness probe
//!
//! Oversized text maps to HTTP 413; every other outcome is a well-formed
//! verdict with status 200.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scamshield::server::{create_router, AppState, ServerConfig};
//! use scamshield::Config;
//!
//! let state = Arc::new(AppState::new(ServerConfig::default(), Config::from_env())?);
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

mod config;
mod handlers;
mod state;

pub use config::ServerConfig;
pub use handlers::{create_router, health_check};
pub use state::AppState;
