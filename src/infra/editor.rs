use std::path::{Path, PathBuf};

use crate::domain::{Editor, PanelError};

#[derive(Debug, Clone, Copy)]
enum EditorOpenStyle {
    FileColonLine,
    FlagFileColonLine(&'static str),
    FlagLineThenFile(&'static str),
}

struct EditorDefinition {
    id: &'static str,
    label: &'static str,
    command: &'static str,
    extra_args: &'static [&'static str],
    open_style: EditorOpenStyle,
}

#[derive(Debug, Clone)]
pub struct EditorCandidate {
    pub id: &'static str,
    pub label: &'static str,
    pub path: PathBuf,
}

const EDITOR_DEFINITIONS: &[EditorDefinition] = &[
    EditorDefinition {
        id: "vscode",
        label: "Visual Studio Code",
        command: "code",
        extra_args: &["-r"],
        open_style: EditorOpenStyle::FlagFileColonLine("-g"),
    },
    EditorDefinition {
        id: "cursor",
        label: "Cursor",
        command: "cursor",
        extra_args: &["-r"],
        open_style: EditorOpenStyle::FlagFileColonLine("-g"),
    },
    EditorDefinition {
        id: "vscode-insiders",
        label: "VS Code Insiders",
        command: "code-insiders",
        extra_args: &["-r"],
        open_style: EditorOpenStyle::FlagFileColonLine("-g"),
    },
    EditorDefinition {
        id: "zed",
        label: "Zed",
        command: "zed",
        extra_args: &[],
        open_style: EditorOpenStyle::FileColonLine,
    },
    EditorDefinition {
        id: "idea",
        label: "IntelliJ IDEA",
        command: "idea",
        extra_args: &[],
        open_style: EditorOpenStyle::FlagLineThenFile("--line"),
    },
];

fn find_bin(command: &str) -> Option<PathBuf> {
    which::which(command).ok()
}

pub fn list_available_editors() -> Vec<EditorCandidate> {
    let mut editors = Vec::new();
    for def in EDITOR_DEFINITIONS {
        if let Some(path) = find_bin(def.command) {
            editors.push(EditorCandidate {
                id: def.id,
                label: def.label,
                path,
            });
        }
    }
    editors
}

/// Editor definition id for a requested editor. `auto` picks the first
/// installed editor, in definition order.
pub fn editor_id_for(editor: Editor) -> Option<&'static str> {
    match editor {
        Editor::Vscode => Some("vscode"),
        Editor::Cursor => Some("cursor"),
        Editor::Auto => list_available_editors().first().map(|c| c.id),
    }
}

/// Build the argv used to open `file_path` at `line_number`.
pub fn open_args(editor_id: &str, file_path: &Path, line_number: usize) -> Option<Vec<String>> {
    let def = editor_definition(editor_id)?;
    let mut args = Vec::new();
    let file_str = file_path.to_string_lossy().to_string();
    let line_str = line_number.to_string();

    for extra in def.extra_args {
        args.push((*extra).to_string());
    }

    match def.open_style {
        EditorOpenStyle::FileColonLine => {
            args.push(format!("{file_str}:{line_str}"));
        }
        EditorOpenStyle::FlagFileColonLine(flag) => {
            args.push(flag.to_string());
            args.push(format!("{file_str}:{line_str}"));
        }
        EditorOpenStyle::FlagLineThenFile(flag) => {
            args.push(flag.to_string());
            args.push(line_str);
            args.push(file_str);
        }
    }

    Some(args)
}

pub fn editor_command_for_open(
    editor_id: &str,
    file_path: &Path,
    line_number: usize,
) -> Option<(PathBuf, Vec<String>)> {
    let def = editor_definition(editor_id)?;
    let command_path = find_bin(def.command)?;
    let args = open_args(editor_id, file_path, line_number)?;
    Some((command_path, args))
}

/// `vscode://file/<path>:<line>` style URL handled by the editor itself.
pub fn editor_file_url(editor: Editor, file_path: &Path, line_number: usize) -> String {
    let path = file_path.to_string_lossy();
    let path = path.trim_start_matches('/');
    format!("{}://file/{path}:{line_number}", editor.scheme())
}

/// Resolve a path from the panel against the workspace it belongs to.
pub fn resolve_in_workspace(file: &str, workspace: Option<&Path>) -> Result<PathBuf, PanelError> {
    let path = Path::new(file);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    workspace
        .map(|root| root.join(path))
        .ok_or_else(|| PanelError::NoWorkspace(file.to_string()))
}

/// Launch the editor binary for `editor` at `file_path:line_number`,
/// falling back to the editor's URL handler when no binary is installed.
pub fn open_in_editor(editor: Editor, file_path: &Path, line_number: usize) -> Result<(), PanelError> {
    if let Some((command, args)) =
        editor_id_for(editor).and_then(|id| editor_command_for_open(id, file_path, line_number))
    {
        log::debug!("[editor] {} {}", command.display(), args.join(" "));
        std::process::Command::new(command).args(args).spawn()?;
        return Ok(());
    }

    let url = editor_file_url(editor, file_path, line_number);
    log::debug!("[editor] no editor binary for {editor}; opening {url}");
    open::that(&url).map_err(|_| PanelError::EditorNotFound(editor.to_string()))
}

pub fn copy_to_clipboard(text: &str) -> Result<(), PanelError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| PanelError::Clipboard(e.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| PanelError::Clipboard(e.to_string()))
}

fn editor_definition(editor_id: &str) -> Option<&'static EditorDefinition> {
    EDITOR_DEFINITIONS.iter().find(|def| def.id == editor_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_args_per_style() {
        let file = Path::new("/repo/src/main.rs");
        assert_eq!(
            open_args("vscode", file, 12).unwrap(),
            ["-r", "-g", "/repo/src/main.rs:12"]
        );
        assert_eq!(open_args("zed", file, 3).unwrap(), ["/repo/src/main.rs:3"]);
        assert_eq!(
            open_args("idea", file, 7).unwrap(),
            ["--line", "7", "/repo/src/main.rs"]
        );
        assert!(open_args("notepad", file, 1).is_none());
    }

    #[test]
    fn test_editor_file_url() {
        assert_eq!(
            editor_file_url(Editor::Cursor, Path::new("/repo/a.ts"), 4),
            "cursor://file/repo/a.ts:4"
        );
        assert_eq!(
            editor_file_url(Editor::Auto, Path::new("/repo/a.ts"), 1),
            "vscode://file/repo/a.ts:1"
        );
    }

    #[test]
    fn test_resolve_in_workspace() {
        let root = Path::new("/work/project");
        assert_eq!(
            resolve_in_workspace("src/a.ts", Some(root)).unwrap(),
            PathBuf::from("/work/project/src/a.ts")
        );
        assert_eq!(
            resolve_in_workspace("/abs/a.ts", None).unwrap(),
            PathBuf::from("/abs/a.ts")
        );
        assert!(matches!(
            resolve_in_workspace("src/a.ts", None),
            Err(PanelError::NoWorkspace(_))
        ));
    }

    #[test]
    fn test_explicit_editors_map_to_definitions() {
        assert_eq!(editor_id_for(Editor::Vscode), Some("vscode"));
        assert_eq!(editor_id_for(Editor::Cursor), Some("cursor"));
    }
}
