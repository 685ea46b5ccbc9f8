//! Core error types for fastout-core.
//!
//! This module defines the error hierarchy using thiserror. Store
//! operations validate their input before touching state, so any error
//! returned here means the store was left exactly as it was.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Core error type for fastout-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected input
    #[error("Invalid argument: {0}")]
    Validation(#[from] ValidationError),

    /// Premium-gated feature requested by a free user
    #[error("Entitlement error: {0}")]
    Entitlement(#[from] EntitlementError),

    /// Payment collaborator failures
    #[error("Payment failed: {0}")]
    Payment(#[from] PaymentError),

    /// Identity collaborator failures
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Process exit code used by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::Validation(_) => 3,
            CoreError::Entitlement(_) | CoreError::Auth(_) => 2,
            _ => 1,
        }
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A value that must be strictly positive was zero
    #[error("'{field}' must be greater than zero")]
    NotPositive { field: &'static str },

    /// Arithmetic on a counter would overflow
    #[error("'{field}' would overflow")]
    Overflow { field: &'static str },

    /// Operation needs an active fast
    #[error("no fast is currently active")]
    NoActiveFast,

    /// A fast is already running
    #[error("a '{protocol}' fast is already active")]
    FastAlreadyActive { protocol: String },

    /// Name did not match any catalog entry
    #[error("unknown {kind}: '{name}'")]
    Unknown { kind: &'static str, name: String },

    /// The active fast has not reached its target yet
    #[error("the '{protocol}' fast runs until {ends_at} ({remaining_minutes} min left)")]
    FastNotFinished {
        protocol: String,
        ends_at: DateTime<Utc>,
        remaining_minutes: i64,
    },
}

/// Entitlement errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    #[error("'{feature}' is available for premium members only")]
    PremiumRequired { feature: String },
}

/// Payment collaborator errors.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Processor answered with a non-success status
    #[error("payment declined (HTTP {status}): {message}")]
    Declined { status: u16, message: String },

    /// Request never completed
    #[error("payment request failed: {0}")]
    Transport(String),

    /// Processor answered with something we cannot read
    #[error("invalid payment response: {0}")]
    InvalidResponse(String),

    /// Endpoint missing or malformed
    #[error("payment endpoint not configured: {0}")]
    NotConfigured(String),
}

/// Identity collaborator errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Email or password empty
    #[error("email and password are required")]
    MissingCredentials,

    /// Provider refused the request
    #[error("{action} rejected (HTTP {status}): {message}")]
    Rejected {
        action: &'static str,
        status: u16,
        message: String,
    },

    /// Request never completed
    #[error("identity request failed: {0}")]
    Transport(String),

    /// Provider answered with something we cannot read
    #[error("invalid identity response: {0}")]
    InvalidResponse(String),

    /// Provider URL or key missing
    #[error("identity provider not configured: {0}")]
    NotConfigured(String),

    /// No stored session
    #[error("not signed in")]
    NotSignedIn,

    /// OS keyring failure
    #[error("credential store error: {0}")]
    Keyring(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
