use miette::Diagnostic;
use thiserror::Error;

use crate::client::ClientError;

/// Errors that stop the MCP server itself (not individual tool calls).
#[derive(Error, Diagnostic, Debug)]
pub enum ServerError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] ClientError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(openproject_mcp::server::io))]
    Io(#[from] std::io::Error),

    #[error("MCP session failed to initialize: {message}")]
    #[diagnostic(code(openproject_mcp::server::initialize))]
    Initialize { message: String },

    #[error("MCP session ended abnormally: {message}")]
    #[diagnostic(code(openproject_mcp::server::runtime))]
    Runtime { message: String },

    #[error("HTTP transport is not available in this build")]
    #[diagnostic(
        code(openproject_mcp::server::http_disabled),
        help("Rebuild with the `http` feature or use --transport stdio")
    )]
    HttpDisabled,
}
