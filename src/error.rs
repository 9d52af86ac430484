//! Error types for session-dashboard.

use thiserror::Error;

/// Main error type for dashboard operations.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The session-resolution collaborator failed.
    #[error("session lookup failed: {0}")]
    SessionLookup(String),

    /// Template rendering failed.
    #[error("render error: {0}")]
    Render(#[from] askama::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
