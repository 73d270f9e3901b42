use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A reviewer follow-up: a short button label plus the prompt it sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub label: String,
    /// Arbitrary multi-line text, passed through verbatim.
    pub prompt: String,
}

impl Action {
    pub fn new(label: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prompt: prompt.into(),
        }
    }
}

/// An explanation attached to a file (and optionally a line) of the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Path or path fragment; matched loosely against rendered file names.
    pub file: String,
    /// 1-based line in the new version of the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl Annotation {
    pub fn new(file: impl Into<String>, line: Option<u32>, explanation: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            explanation: explanation.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// Editor the reviewer is working in. Drives button logos and deep links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Editor {
    Vscode,
    Cursor,
    #[default]
    Auto,
}

impl Editor {
    /// URL scheme used for `<scheme>://file/...` links.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Vscode | Self::Auto => "vscode",
        }
    }

    /// Whether prompts can be sent through the Cursor chat deep link.
    pub fn supports_prompt_links(self) -> bool {
        matches!(self, Self::Cursor | Self::Auto)
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vscode => write!(f, "vscode"),
            Self::Cursor => write!(f, "cursor"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for Editor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vscode" | "code" => Ok(Self::Vscode),
            "cursor" => Ok(Self::Cursor),
            "auto" | "" => Ok(Self::Auto),
            other => Err(format!("unknown editor '{other}'")),
        }
    }
}

/// How a file's diff table is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DiffLayout {
    /// One column with inline +/- rows.
    #[serde(rename = "line-by-line")]
    LineByLine,
    /// Old file on the left, new file on the right.
    #[default]
    #[serde(rename = "side-by-side")]
    SideBySide,
}

impl DiffLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LineByLine => "line-by-line",
            Self::SideBySide => "side-by-side",
        }
    }
}

impl fmt::Display for DiffLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffLayout {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line-by-line" | "unified" | "line" => Ok(Self::LineByLine),
            "side-by-side" | "split" | "side" => Ok(Self::SideBySide),
            other => Err(format!("unknown layout '{other}'")),
        }
    }
}
