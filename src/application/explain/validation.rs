//! Tool-call checks that run before anything is rendered.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{ExplainRequest, ValidationError};

static SHELL_COMMAND_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\$\(.*\)$", // $(cat file)
        r"^`.*`$",     // `cat file`
        r"^cat\s+",    // cat /path/to/file
        r"^<\s*/",     // < /path/to/file
    ]
    .iter()
    .map(|p| Regex::new(p).expect("shell command pattern"))
    .collect()
});

const DIFF_MARKERS: [&str; 4] = ["diff --git", "@@", "---", "+++"];

const PREVIEW_CHARS: usize = 50;

/// True when `diff` reads like a command that would produce a diff rather
/// than the diff itself.
pub fn looks_like_shell_command(diff: &str) -> bool {
    let trimmed = diff.trim();
    let command = SHELL_COMMAND_PATTERNS.iter().any(|re| re.is_match(trimmed));
    let diff_like = DIFF_MARKERS.iter().any(|marker| diff.contains(marker));
    command && !diff_like
}

/// Reject calls that must never reach the renderer.
pub fn validate_request(request: &ExplainRequest) -> Result<(), ValidationError> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "title" });
    }
    if request.diff.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField { field: "diff" });
    }
    if looks_like_shell_command(&request.diff) {
        return Err(ValidationError::ShellCommand {
            preview: request.diff.chars().take(PREVIEW_CHARS).collect(),
        });
    }
    Ok(())
}
