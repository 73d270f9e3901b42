use serde::{Deserialize, Serialize};

/// Messages posted by the rendered document to the editor panel host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum PanelMessage {
    /// Reveal `file` (relative to the workspace) at `line`.
    OpenFile {
        file: String,
        #[serde(default)]
        line: Option<u32>,
    },
    /// Hand the decoded action prompt to the assistant.
    ExecuteAction { prompt: String },
}

impl PanelMessage {
    pub fn command(&self) -> &'static str {
        match self {
            Self::OpenFile { .. } => "openFile",
            Self::ExecuteAction { .. } => "executeAction",
        }
    }
}
