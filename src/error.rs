//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// The external map service could not be brought up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("map service rejected the credential: {0}")]
    InvalidCredential(String),
    #[error("map service unreachable: {0}")]
    Network(String),
    #[error("map service is missing the {0} library")]
    MissingLibrary(&'static str),
}

/// A credential submission was refused.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("credential is empty")]
    EmptyCredential,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: malformed store: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A timer could not be scheduled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("timer interval must be positive")]
    NonPositiveInterval,
    #[error("timer due time is out of range")]
    OutOfRange,
}

/// The app could not be built.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}: {1}")]
    InvalidField(&'static str, String),
}
