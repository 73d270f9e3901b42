//! MCP server exposing the `show_diff_explanation` tool over stdio.
//!
//! Each call is validated, rendered and published through one
//! [`ExplanationHost`] owned by the server for its lifetime.

mod config;
mod logging;
mod tool;
mod transport;

pub use config::ServerConfig;

use std::sync::Arc;

use pmcp::{Server, ServerCapabilities};

use crate::application::host::ExplanationHost;
use crate::infra::app_config::load_config;

/// Run the MCP server over stdio. Blocks until the client disconnects.
pub async fn run_explain_mcp_server(config: ServerConfig) -> pmcp::Result<()> {
    let config = Arc::new(config);
    logging::log_to_file(&config, "starting explain-changes MCP server");

    let settings = config.host_settings(&load_config());
    let host = Arc::new(ExplanationHost::new(settings));

    let server = Server::builder()
        .name("explain-changes")
        .version(env!("CARGO_PKG_VERSION"))
        .capabilities(ServerCapabilities::default())
        .tool(
            tool::TOOL_NAME,
            tool::create_show_diff_explanation_tool(config.clone(), host),
        )
        .build()?;

    logging::log_to_file(&config, "running explain-changes MCP server on stdio");
    let transport = transport::LineDelimitedStdioTransport::new();
    server.run(transport).await
}

#[cfg(test)]
mod tests;
