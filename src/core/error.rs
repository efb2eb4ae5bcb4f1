//! Error types for the roadnet library
//!
//! Provides typed error handling for distance resolution and metric aggregation.

use thiserror::Error;

/// Main error type for roadnet operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure or non-success status from the routing service
    #[error("Routing service unavailable: {0}")]
    RemoteUnavailable(String),

    /// Routing service answered but carried no usable route candidate
    #[error("Routing service returned no route for the requested pair")]
    NoRouteFound,

    /// Persistent distance store could not be opened, initialized or queried
    #[error("Distance cache unavailable: {0}")]
    CacheUnavailable(#[from] rusqlite::Error),

    /// Aggregation attempted over a snapshot with no component of two or more nodes
    #[error("No component with at least two nodes in the {year} snapshot")]
    InsufficientComponents { year: i32 },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::RemoteUnavailable(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Error::RemoteUnavailable(format!("connection failed: {err}"))
        } else {
            Error::RemoteUnavailable(err.to_string())
        }
    }
}

/// Convenience result type for roadnet operations
pub type Result<T> = std::result::Result<T, Error>;
