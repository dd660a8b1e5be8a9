//! MCP server for OpenProject.
//!
//! - `client`: OpenProject API v3 access behind the [`client::ResourceClient`] trait
//! - `views`: bulk loading, statistics, hierarchy and blocker analysis
//! - `mcp`: the MCP tools and transports
//! - `config`: validated runtime configuration

pub mod client;
pub mod config;
pub mod mcp;
pub mod views;
