use super::config::ServerConfig;
use super::logging::log_to_file;
use crate::application::host::{ExplanationHost, PublishError};
use crate::domain::ExplainRequest;
use pmcp::{SimpleTool, ToolHandler};
use serde_json::{Value, json};
use std::sync::Arc;

pub(super) const TOOL_NAME: &str = "show_diff_explanation";

/// Create the show_diff_explanation tool.
pub(super) fn create_show_diff_explanation_tool(
    config: Arc<ServerConfig>,
    host: Arc<ExplanationHost>,
) -> impl ToolHandler {
    SimpleTool::new(TOOL_NAME, move |args: Value, _extra| {
        let config = config.clone();
        let host = host.clone();
        Box::pin(async move { handle_show(config, host, args).await })
    })
    .with_description(
        "Shows a git diff with your annotations as a rendered page. \
         Use this tool after analyzing code changes to present the diff visually with your explanations. \
         The diff is rendered side-by-side or line-by-line, each annotation is placed under the line it describes, \
         and the page is opened in the user's browser or handed to the editor panel. \
         Pass the raw output of git diff in 'diff', never the command itself.",
    )
    .with_schema(show_diff_explanation_schema())
}

async fn handle_show(
    config: Arc<ServerConfig>,
    host: Arc<ExplanationHost>,
    args: Value,
) -> pmcp::Result<Value> {
    log_to_file(&config, "show_diff_explanation called");

    let mut request = ExplainRequest::from_value(args).map_err(|err| {
        log_to_file(&config, &format!("rejected arguments: {err}"));
        pmcp::Error::Validation(err.to_string())
    })?;
    if request.title.trim().is_empty() || request.diff.trim().is_empty() {
        log_to_file(&config, "rejected call without title or diff");
        return Err(pmcp::Error::Validation(
            "'title' and 'diff' are required".to_string(),
        ));
    }
    config.apply_defaults(&mut request);

    let publish_host = host.clone();
    let publish_result =
        tokio::task::spawn_blocking(move || publish_host.publish(&request)).await;

    match publish_result {
        Ok(Ok(published)) => {
            log_to_file(
                &config,
                &format!(
                    "published {} annotation(s) to {}",
                    published.annotation_count,
                    published.path.display()
                ),
            );
            Ok(json!({
                "status": "ok",
                "message": published.message(),
                "file": published.path,
                "deep_link": published.deep_link,
            }))
        }
        Ok(Err(PublishError::Validation(err))) => {
            log_to_file(&config, &format!("validation failed: {err}"));
            Err(pmcp::Error::Validation(err.to_string()))
        }
        Ok(Err(err)) => {
            log_to_file(&config, &format!("publish failed: {err}"));
            Err(pmcp::Error::Internal(format!(
                "failed to show diff explanation: {err}"
            )))
        }
        Err(join_err) => {
            log_to_file(&config, &format!("publish task join error: {join_err}"));
            Err(pmcp::Error::Internal(format!(
                "show_diff_explanation join error: {join_err}"
            )))
        }
    }
}

fn action_schema(label: &str, prompt: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "label": { "type": "string", "description": label },
            "prompt": { "type": "string", "description": prompt }
        },
        "required": ["label", "prompt"]
    })
}

fn show_diff_explanation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Title for the page (e.g., 'Changes in PR #123')"
            },
            "summary": {
                "type": "string",
                "description": "High-level summary of the changes"
            },
            "diff": {
                "type": "string",
                "description": "The raw git diff output (unified diff format). Pass the actual diff content, not a file path or shell command."
            },
            "annotations": {
                "type": "array",
                "description": "Annotations explaining specific parts of the diff",
                "items": {
                    "type": "object",
                    "properties": {
                        "file": {
                            "type": "string",
                            "description": "File path the annotation refers to"
                        },
                        "line": {
                            "type": "number",
                            "description": "Line number in the new file (optional)"
                        },
                        "explanation": {
                            "type": "string",
                            "description": "Your explanation of this change"
                        },
                        "actions": {
                            "type": "array",
                            "description": "Reviewer actions: specific, contextual suggestions such as 'Extract to useAuth hook' rather than 'Refactor'",
                            "items": action_schema(
                                "Short, specific action label (e.g., 'Add null check')",
                                "Full context for the action: what to change, the relevant code with file:line, and why"
                            )
                        }
                    },
                    "required": ["file", "explanation"]
                }
            },
            "editor": {
                "type": "string",
                "enum": ["vscode", "cursor", "auto"],
                "description": "Which editor you're using"
            },
            "globalActions": {
                "type": "array",
                "description": "Project-wide reviewer actions (e.g., 'Add integration tests for new endpoints')",
                "items": action_schema(
                    "Short, specific action label for a project-wide improvement",
                    "Full context: what to change across files, which files are affected, and why"
                )
            },
            "workspacePath": {
                "type": "string",
                "description": "Absolute path to the workspace folder. Used to show the panel only in the matching editor window."
            }
        },
        "required": ["title", "diff"]
    })
}
