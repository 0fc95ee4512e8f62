//! Server state.

use std::time::{Duration, Instant};

use super::config::ServerConfig;
use crate::config::Config;
use crate::error::Result;
use crate::scan::Scanner;

/// Application state shared across handlers.
///
/// Everything here is immutable after startup; handlers share it behind
/// an `Arc` with no locking.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// The scan pipeline
    pub scanner: Scanner,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(server_config: ServerConfig, scan_config: Config) -> Result<Self> {
        Ok(Self {
            config: server_config,
            scanner: Scanner::new(scan_config)?,
            start_time: Instant::now(),
        })
    }

    /// Get server uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}
