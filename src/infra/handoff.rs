//! Pending explanation handoff for the editor panel.
//!
//! The MCP server drops the request into `~/.explain-changes/pending.json`
//! and hands the user a deep link; the panel picks the file up, renders it
//! and deletes it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{Editor, ExplainRequest};

const HANDOFF_DIRNAME: &str = ".explain-changes";
const PENDING_FILENAME: &str = "pending.json";

/// Extension id the deep link targets.
pub const PANEL_EXTENSION_ID: &str = "explain-changes.explain-changes-extension";

/// Data passed from the MCP server to the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingExplanation {
    #[serde(flatten)]
    pub request: ExplainRequest,

    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl PendingExplanation {
    pub fn new(request: ExplainRequest) -> Self {
        Self {
            request,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Whether this explanation belongs to the editor window at `workspace`.
    /// Explanations without a workspace are shown anywhere.
    pub fn matches_workspace(&self, workspace: &Path) -> bool {
        let Some(expected) = self.request.workspace_path.as_deref() else {
            return true;
        };
        normalize_workspace(expected) == normalize_workspace(&workspace.to_string_lossy())
    }
}

fn normalize_workspace(path: &str) -> String {
    path.trim_end_matches(['/', '\\']).to_lowercase()
}

/// Editor a panel deep link should target. The panel ships for Cursor first,
/// so `auto` resolves to it.
pub fn panel_editor(editor: Editor) -> Editor {
    match editor {
        Editor::Auto => Editor::Cursor,
        other => other,
    }
}

pub fn panel_deep_link(editor: Editor) -> String {
    format!(
        "{}://{PANEL_EXTENSION_ID}/show",
        panel_editor(editor).scheme()
    )
}

/// Default handoff directory under the user's home.
pub fn handoff_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(HANDOFF_DIRNAME))
}

pub fn pending_path_in(dir: &Path) -> PathBuf {
    dir.join(PENDING_FILENAME)
}

/// Save a pending explanation into `dir`, creating it when needed.
pub fn save_pending_in(dir: &Path, pending: &PendingExplanation) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir).context("Failed to create handoff directory")?;
    }
    let path = pending_path_in(dir);
    let json = serde_json::to_string_pretty(pending)
        .context("Failed to serialize pending explanation")?;
    fs::write(&path, json).context("Failed to write pending explanation file")?;
    Ok(path)
}

/// Load and remove the pending explanation in `dir`, if any.
pub fn take_pending_in(dir: &Path) -> Result<Option<PendingExplanation>> {
    let path = pending_path_in(dir);
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read pending explanation file")?;
    let pending: PendingExplanation =
        serde_json::from_str(&json).context("Failed to parse pending explanation file")?;

    fs::remove_file(&path).ok();

    Ok(Some(pending))
}

pub fn save_pending(pending: &PendingExplanation) -> Result<PathBuf> {
    save_pending_in(&handoff_dir()?, pending)
}

pub fn take_pending() -> Result<Option<PendingExplanation>> {
    take_pending_in(&handoff_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Annotation;

    fn sample() -> PendingExplanation {
        let mut request = ExplainRequest::new("Title", "diff --git a/x b/x\n");
        request.annotations = vec![Annotation::new("x", Some(1), "why")];
        request.workspace_path = Some("/Users/dev/Project/".to_string());
        PendingExplanation {
            request,
            timestamp: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_pending_round_trip_and_take_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let pending = sample();

        let path = save_pending_in(dir.path(), &pending).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"workspacePath\""));
        assert!(json.contains("\"timestamp\": 1700000000000"));

        let loaded = take_pending_in(dir.path()).unwrap();
        assert_eq!(loaded, Some(pending));
        assert!(!path.exists());
        assert_eq!(take_pending_in(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_workspace_match_ignores_case_and_trailing_slash() {
        let pending = sample();
        assert!(pending.matches_workspace(Path::new("/users/dev/project")));
        assert!(!pending.matches_workspace(Path::new("/users/dev/other")));

        let mut anywhere = sample();
        anywhere.request.workspace_path = None;
        assert!(anywhere.matches_workspace(Path::new("/tmp")));
    }

    #[test]
    fn test_deep_link() {
        assert_eq!(
            panel_deep_link(Editor::Vscode),
            "vscode://explain-changes.explain-changes-extension/show"
        );
        assert_eq!(
            panel_deep_link(Editor::Auto),
            "cursor://explain-changes.explain-changes-extension/show"
        );
    }
}
