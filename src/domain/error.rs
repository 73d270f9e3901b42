//! Domain error types for explain-changes.
//!
//! Only validation and document-level template failures abort a request.
//! Per-file render failures are isolated by the caller, and anchor or file
//! mismatches are not errors at all.

use thiserror::Error;

/// Rejections raised at the tool-call boundary, before rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{field}' is required")]
    MissingRequiredField { field: &'static str },

    #[error(
        "the 'diff' parameter contains a shell command (\"{preview}...\") instead of actual diff content. \
         Run the git diff command and pass its output directly in the 'diff' parameter"
    )]
    ShellCommand { preview: String },

    #[error("invalid arguments: {0}")]
    InvalidPayload(String),
}

/// Failure to turn one file fragment into a table. Caught per file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffRenderError {
    #[error("failed to parse diff fragment: {0}")]
    Parse(String),

    #[error("fragment does not describe any file")]
    NoFile,
}

/// Failure to assemble the final document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template '{0}'")]
    UnknownTemplate(String),

    #[error("rendering template '{name}' failed: {message}")]
    Template { name: String, message: String },

    #[error("failed to serialize annotations: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure to decode an action payload back into its prompt.
#[derive(Debug, Error)]
pub enum ActionDecodeError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded prompt is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Failures while carrying out a panel command on the host.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("no workspace folder to resolve '{0}' against")]
    NoWorkspace(String),

    #[error("no editor found for '{0}'")]
    EditorNotFound(String),

    #[error("failed to launch: {0}")]
    Io(#[from] std::io::Error),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}
