//! Resource client error types.
//!
//! Every fetch issued against OpenProject resolves to one of these. They use
//! miette for diagnostic output and thiserror for the derive macros.

use miette::Diagnostic;
use thiserror::Error;

use super::ResourceKind;

/// Errors raised while talking to the OpenProject API.
#[derive(Error, Diagnostic, Debug)]
pub enum ClientError {
    #[error("Failed to reach OpenProject: {source}")]
    #[diagnostic(
        code(openproject_mcp::client::transport),
        help("Check OPENPROJECT_URL and that the server is reachable.")
    )]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenProject API error ({status}): {message}")]
    #[diagnostic(code(openproject_mcp::client::remote))]
    Remote { status: u16, message: String },

    #[error("{} not found: '{id}'", .kind.entity_name())]
    #[diagnostic(code(openproject_mcp::client::not_found))]
    NotFound { kind: ResourceKind, id: String },

    #[error("Invalid response from OpenProject: {message}")]
    #[diagnostic(
        code(openproject_mcp::client::invalid_response),
        help("The server returned data in an unexpected format. Is this an API v3 endpoint?")
    )]
    InvalidResponse { message: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(openproject_mcp::client::cancelled))]
    Cancelled,
}

impl ClientError {
    /// Whether the remote refused the request because of the caller's input.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ClientError::Remote { status, .. } if (400..500).contains(status))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::InvalidResponse {
                message: e.to_string(),
            }
        } else {
            ClientError::Transport { source: e }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

/// Result type for resource client operations.
pub type ClientResult<T> = Result<T, ClientError>;
