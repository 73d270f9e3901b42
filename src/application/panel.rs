//! Host side of the editor panel channel.
//!
//! The rendered page posts [`PanelMessage`]s; this turns each one into a
//! concrete side effect on the user's machine.

use std::path::{Path, PathBuf};

use crate::application::explain::cursor_prompt_link;
use crate::domain::{Editor, PanelError, PanelMessage};
use crate::infra::editor::{copy_to_clipboard, open_in_editor, resolve_in_workspace};

/// What a panel message resolves to before anything is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    OpenFile { path: PathBuf, line: u32 },
    OpenPromptLink { url: String, prompt: String },
    CopyPrompt { prompt: String },
}

/// Result of carrying out a [`PanelCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    OpenedFile(PathBuf),
    SentPrompt,
    CopiedPrompt,
}

pub fn plan_panel_message(
    message: PanelMessage,
    editor: Editor,
    workspace: Option<&Path>,
) -> Result<PanelCommand, PanelError> {
    match message {
        PanelMessage::OpenFile { file, line } => Ok(PanelCommand::OpenFile {
            path: resolve_in_workspace(&file, workspace)?,
            line: line.unwrap_or(1).max(1),
        }),
        PanelMessage::ExecuteAction { prompt } if editor.supports_prompt_links() => {
            Ok(PanelCommand::OpenPromptLink {
                url: cursor_prompt_link(&prompt),
                prompt,
            })
        }
        PanelMessage::ExecuteAction { prompt } => Ok(PanelCommand::CopyPrompt { prompt }),
    }
}

pub fn run_panel_command(command: PanelCommand, editor: Editor) -> Result<PanelOutcome, PanelError> {
    match command {
        PanelCommand::OpenFile { path, line } => {
            open_in_editor(editor, &path, line as usize)?;
            Ok(PanelOutcome::OpenedFile(path))
        }
        PanelCommand::OpenPromptLink { url, prompt } => match open::that(&url) {
            Ok(()) => Ok(PanelOutcome::SentPrompt),
            Err(err) => {
                log::warn!("failed to open prompt link, copying instead: {err}");
                copy_to_clipboard(&prompt)?;
                Ok(PanelOutcome::CopiedPrompt)
            }
        },
        PanelCommand::CopyPrompt { prompt } => {
            copy_to_clipboard(&prompt)?;
            Ok(PanelOutcome::CopiedPrompt)
        }
    }
}

/// Handle one message from the panel.
pub fn dispatch_panel_message(
    message: PanelMessage,
    editor: Editor,
    workspace: Option<&Path>,
) -> Result<PanelOutcome, PanelError> {
    log::debug!("panel message: {}", message.command());
    let command = plan_panel_message(message, editor, workspace)?;
    run_panel_command(command, editor)
}
