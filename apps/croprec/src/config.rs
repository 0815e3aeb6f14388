//! # Server Configuration
//!
//! Resolved settings for `croprec serve`. Values come from CLI flags, which
//! fall back to `CROPREC_*` environment variables and then to the defaults
//! below.

use croprec_core::{ENCODER_FILE, MODEL_FILE};
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_DIR: &str = "model";

/// Requests per second admitted on the prediction/report routes. 0 disables.
pub const DEFAULT_RATE_LIMIT: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the two artifact files.
    pub model_dir: PathBuf,
    pub rate_limit_per_second: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            rate_limit_per_second: DEFAULT_RATE_LIMIT,
        }
    }
}

impl ServerConfig {
    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path of the forest file.
    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    /// Path of the label decoder file.
    #[must_use]
    pub fn encoder_path(&self) -> PathBuf {
        self.model_dir.join(ENCODER_FILE)
    }
}
