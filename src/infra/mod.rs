//! Infrastructure layer (adapters/implementations).
//!
//! Diff parsing, editors, the panel handoff file, persisted config and the
//! MCP server.

pub mod app_config;
pub mod diff;
pub mod editor;
pub mod handoff;
pub mod mcp;
