//! OpenProject MCP server binary.
//!
//! Parses the command line, validates it into a [`Config`] and hands over to
//! the MCP layer. Logs go to stderr so stdout stays free for the stdio
//! transport.

use std::net::IpAddr;
use std::time::Duration;

use clap::Parser;
use miette::Diagnostic;
use openproject_mcp::config::{
    Config, ConfigError, DEFAULT_MAX_DEPTH_LIMIT, DEFAULT_OPERATION_TIMEOUT, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT, ServerSettings, Transport,
};
use openproject_mcp::mcp::{self, ServerError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(op_mcp::binary::config))]
    Config(#[from] ConfigError),

    #[error("MCP server error: {0}")]
    #[diagnostic(code(op_mcp::binary::server))]
    Server(#[from] ServerError),
}

#[derive(Parser)]
#[command(name = "op-mcp")]
#[command(author, version, about = "MCP server for OpenProject", long_about = None)]
struct Cli {
    /// OpenProject instance URL
    #[arg(long, env = "OPENPROJECT_URL")]
    url: String,

    /// API key of the acting user
    #[arg(long, env = "OPENPROJECT_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Transport to serve MCP over
    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    transport: Transport,

    /// Host address to bind to (http transport)
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on (http transport)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Timeout for a single HTTP request to OpenProject, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    request_timeout_secs: u64,

    /// Deadline for one tool call, in seconds
    #[arg(long, default_value_t = DEFAULT_OPERATION_TIMEOUT.as_secs())]
    operation_timeout_secs: u64,

    /// Upper bound for the hierarchy depth a caller may request
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH_LIMIT)]
    max_depth_limit: usize,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    mcp::init_tracing();
    let cli = Cli::parse();

    run(cli).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), BinaryError> {
    let mut config = Config::new(&cli.url, &cli.api_key)?;
    config.client.request_timeout = Duration::from_secs(cli.request_timeout_secs.max(1));
    config.server = ServerSettings {
        operation_timeout: Duration::from_secs(cli.operation_timeout_secs.max(1)),
        max_depth_limit: cli.max_depth_limit,
    };
    config.transport = cli.transport;
    config.host = cli.host;
    config.port = cli.port;

    mcp::run(config).await?;
    Ok(())
}
