pub mod client;
pub mod diagnostics;

use thiserror::Error;

pub use client::{create_browser_client, create_server_client, BackendClient, SESSION_COOKIE};
pub use diagnostics::{run_diagnostics, AuthStatus, DiagnosticReport, TableStatus, PROBED_TABLES};

/// Errors from the hosted backend client
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Missing {0} environment variable")]
    ConfigMissing(&'static str),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid table name: {0}")]
    InvalidTable(String),

    #[error("{message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected Content-Range header: {0}")]
    InvalidCountHeader(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl BackendError {
    /// True when the backend answered with an HTTP response, whatever its status
    pub fn backend_responded(&self) -> bool {
        matches!(self, BackendError::Api { .. } | BackendError::InvalidCountHeader(_))
    }
}
