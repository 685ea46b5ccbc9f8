pub mod config;
pub mod database;

pub use config::{AuthConfig, Config, PaymentConfig};
pub use database::{Database, SessionSummary};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `FASTOUT_DATA_DIR` wins when set. Otherwise `~/.config/fastout[-dev]/`,
/// with the `-dev` suffix when `FASTOUT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FASTOUT_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FASTOUT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("fastout-dev")
            } else {
                base_dir.join("fastout")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
