use super::annotation::{Action, Annotation, Editor};
use super::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Arguments of the `show_diff_explanation` tool call.
///
/// `title` and `diff` default to empty so a missing field surfaces as
/// [`ValidationError::MissingRequiredField`] rather than a serde error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub diff: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub editor: Editor,
    #[serde(default)]
    pub global_actions: Vec<Action>,
    /// Absolute path of the project the diff belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_path: Option<String>,
}

impl ExplainRequest {
    pub fn new(title: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            diff: diff.into(),
            ..Default::default()
        }
    }

    /// Parse tool arguments. Shape errors map to [`ValidationError::InvalidPayload`].
    pub fn from_value(args: serde_json::Value) -> Result<Self, ValidationError> {
        if !args.is_object() {
            return Err(ValidationError::InvalidPayload(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(args).map_err(|e| ValidationError::InvalidPayload(e.to_string()))
    }

    /// Summary with surrounding whitespace removed; `None` when blank.
    pub fn summary_text(&self) -> Option<&str> {
        self.summary
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
