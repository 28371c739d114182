use serde::Serialize;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timed out after {waited:?} waiting for {signal}")]
    SignalTimeout { signal: String, waited: Duration },

    #[error("Unexpected feedback: expected {expected}, got {actual:?}")]
    SignalMismatch { expected: String, actual: String },

    #[error("Persistence mismatch: {0}")]
    PersistenceMismatch(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("WebDriver error ({error}): {message}")]
    WebDriver { error: String, message: String },

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure classes recorded in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    SignalMismatch,
    PersistenceMismatch,
    Backend,
    Driver,
    Harness,
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::SignalTimeout { .. } => FailureKind::Timeout,
            Error::SignalMismatch { .. } => FailureKind::SignalMismatch,
            Error::PersistenceMismatch(_) => FailureKind::PersistenceMismatch,
            Error::Database(_) => FailureKind::Backend,
            Error::WebDriver { .. } | Error::Reqwest(_) => FailureKind::Driver,
            Error::Config(_)
            | Error::Json(_)
            | Error::Io(_)
            | Error::Validation(_)
            | Error::Internal(_) => FailureKind::Harness,
        }
    }

    /// Driver errors a poll loop treats as "condition not met yet".
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::WebDriver { error, .. }
                if error == "no such element" || error == "stale element reference"
        )
    }

    pub fn timeout(signal: impl Into<String>, waited: Duration) -> Self {
        Error::SignalTimeout {
            signal: signal.into(),
            waited,
        }
    }

    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::SignalMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_and_missing_elements_are_transient() {
        let stale = Error::WebDriver {
            error: "stale element reference".into(),
            message: "element is not attached".into(),
        };
        let missing = Error::WebDriver {
            error: "no such element".into(),
            message: "#rol".into(),
        };
        let crashed = Error::WebDriver {
            error: "invalid session id".into(),
            message: "session deleted".into(),
        };

        assert!(stale.is_transient());
        assert!(missing.is_transient());
        assert!(!crashed.is_transient());
        assert_eq!(crashed.kind(), FailureKind::Driver);
    }

    #[test]
    fn database_errors_are_backend_failures() {
        let err = Error::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), FailureKind::Backend);
        assert!(!err.is_transient());
    }
}
