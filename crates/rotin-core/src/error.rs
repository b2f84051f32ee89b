//! Core error types for rotin-core.
//!
//! This module defines the error hierarchy using thiserror. Remote store
//! failures, cache failures and auth failures are all non-fatal: callers
//! surface them as notices and keep running.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rotin-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote store errors
    #[error("Remote store error: {0}")]
    Store(#[from] StoreError),

    /// Local cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a remote collection store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The request never produced a response
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status
    #[error("{}", .detail.as_deref().unwrap_or(GENERIC_FAILURE))]
    Status { status: u16, detail: Option<String> },

    /// The response body could not be decoded
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// The addressed item does not exist remotely
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Message used when the server gives no detail.
pub const GENERIC_FAILURE: &str = "request failed";

impl StoreError {
    /// Human-readable detail suitable for a notice body.
    pub fn detail(&self) -> String {
        match self {
            StoreError::Status { detail, .. } => {
                detail.clone().unwrap_or_else(|| GENERIC_FAILURE.to_string())
            }
            other => other.to_string(),
        }
    }
}

/// Local cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to open the cache database
    #[error("Failed to open cache at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Cache database is locked")]
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

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home directory could not be resolved
    #[error("Could not determine the data directory")]
    NoDataDir,
}

/// Authentication errors carry the provider's code and detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
pub struct AuthError {
    pub code: String,
    pub detail: Option<String>,
}

impl AuthError {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Title is empty after trimming
    #[error("{0}")]
    EmptyTitle(&'static str),

    /// Malformed YYYY-MM-DD day
    #[error("Invalid day '{0}': expected YYYY-MM-DD")]
    InvalidDay(String),

    /// Malformed HH:MM time
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidTime(String),

    /// Malformed YYYY-MM month
    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    /// Unknown schedule category
    #[error("Unknown category '{0}': expected work, personal, health or learning")]
    UnknownCategory(String),

    /// No item with this id in the collection
    #[error("{kind} not found: {id}")]
    UnknownId { kind: &'static str, id: String },

    /// Content edited while no subject is open
    #[error("No subject is open for editing")]
    NoOpenEditor,

    /// Notes touched before any day was opened
    #[error("No day is open")]
    NoOpenDay,
}

impl From<rusqlite::Error> for CacheError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    CacheError::Locked
                } else {
                    CacheError::QueryFailed(err.to_string())
                }
            }
            _ => CacheError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Cache(err.into())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Decode(err.to_string());
        }
        StoreError::Transport {
            url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            message: err.to_string(),
        }
    }
}

impl CoreError {
    /// Short text for the body of a user-facing notice.
    pub fn notice_detail(&self) -> String {
        match self {
            CoreError::Store(e) => e.detail(),
            CoreError::Auth(e) => e.detail.clone().unwrap_or_else(|| e.code.clone()),
            CoreError::Validation(e) => e.to_string(),
            CoreError::Config(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
