//! Error types for the DNSSEC audit
//!
//! Remote call failures are typed so each call site can map them to the
//! degraded value it reports (`UNKNOWN`, `NOT_CONFIGURED`, ...).

use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain an authenticated session for a profile
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The profile does not exist or yields no credentials
    #[error("Profile not found: {profile}")]
    ProfileNotFound { profile: String },

    /// The credential chain failed for another reason
    #[error("Credential provider failed for {profile}: {message}")]
    Provider { profile: String, message: String },
}

/// Failure of a single remote API call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The service answered with an error
    #[error("Service error {code}: {message}")]
    Service { code: String, message: String },

    /// The request never produced a service response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call did not finish within the per-call timeout
    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    /// A client for the API could not be constructed
    #[error("Client construction failed: {0}")]
    ClientConstruction(String),
}

/// Failure of a DNSSEC status query
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DnssecQueryError {
    /// The zone has no DNSSEC configuration
    #[error("DNSSEC not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] ApiError),
}

/// Invalid audit configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failure to persist the report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report row: {0}")]
    Csv(#[from] csv::Error),
}
