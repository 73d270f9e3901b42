//! Application layer (use-cases, policies).
//!
//! Rendering explanations, publishing them, and handling what the rendered
//! page sends back.

pub mod explain;
pub mod host;
pub mod panel;
