// SPDX-FileCopyrightText: 2026 Querylog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the querylog workspace.

use thiserror::Error;

/// The primary error type used across querylog traits and storage operations.
///
/// The hook itself never returns this type: classification is infallible and
/// sink failures are swallowed at the call site.
#[derive(Debug, Error)]
pub enum QueryLogError {
    /// Configuration errors (invalid TOML, unknown severity, bad env key names).
    #[error("configuration error: {0}")]
    Config(String),

    /// The logging backend failed to accept a record.
    #[error("sink error: {message}")]
    Sink {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (connection failure, statement failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The failure carried by a query event.
///
/// `NoRows` is the outcome of a lookup that matched nothing. Hooks treat it as
/// success-like unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The statement completed but returned no rows where one was expected.
    #[error("no rows in result set")]
    NoRows,

    /// The driver reported a failure.
    #[error("{message}")]
    Driver {
        /// Driver-specific error code name, e.g. `ConstraintViolation`.
        code: Option<String>,
        message: String,
    },
}

impl QueryError {
    /// Build a driver error without a code.
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            code: None,
            message: message.into(),
        }
    }

    /// Build a driver error tagged with a code name.
    pub fn driver_with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Returns `true` for the "no rows" condition.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Returns the driver error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Driver { code, .. } => code.as_deref(),
            Self::NoRows => None,
        }
    }
}
