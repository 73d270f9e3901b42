//! Publishing rendered explanations.
//!
//! [`ExplanationHost`] is owned by whoever serves requests (the MCP server
//! or a CLI invocation) and remembers the last thing it published. Nothing
//! here is global; two hosts never see each other's state.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::explain::{render_document, validate_request};
use crate::domain::{DiffLayout, Editor, ExplainRequest, RenderError, ValidationError};
use crate::infra::app_config::{AppConfig, Delivery};
use crate::infra::handoff::{self, PendingExplanation};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write explanation: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to hand off explanation: {0}")]
    Handoff(anyhow::Error),
}

/// How the host publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSettings {
    pub delivery: Delivery,
    pub layout: DiffLayout,
    /// Directory HTML documents are written to.
    pub output_dir: PathBuf,
    /// Open written documents in the default browser.
    pub open_browser: bool,
    /// Override for the panel handoff directory.
    pub handoff_dir: Option<PathBuf>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            delivery: Delivery::Browser,
            layout: DiffLayout::default(),
            output_dir: std::env::temp_dir(),
            open_browser: true,
            handoff_dir: None,
        }
    }
}

impl From<&AppConfig> for HostSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            delivery: config.delivery,
            layout: config.layout,
            output_dir: config
                .output_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            open_browser: config.open_browser,
            handoff_dir: None,
        }
    }
}

/// Outcome of one publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedExplanation {
    pub delivery: Delivery,
    /// HTML document, or the pending handoff file for panel delivery.
    pub path: PathBuf,
    pub editor: Editor,
    pub annotation_count: usize,
    /// Browser was launched for the document.
    pub opened: bool,
    /// Panel deep link, for panel delivery.
    pub deep_link: Option<String>,
}

fn annotation_suffix(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => " with 1 annotation".to_string(),
        n => format!(" with {n} annotations"),
    }
}

/// `file:///...` URL for a written document.
pub fn file_url(path: &Path) -> String {
    url::Url::from_file_path(path)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("file:///{}", path.display()))
}

impl PublishedExplanation {
    /// Text returned to the assistant.
    pub fn message(&self) -> String {
        let suffix = annotation_suffix(self.annotation_count);
        match self.delivery {
            Delivery::Panel => format!(
                "Diff explanation ready{suffix}.\n\n\
                 The panel should open automatically. If not, run \"Explain Changes: Show Panel\" from the command palette.\n\n\
                 Deep link: {}",
                self.deep_link.as_deref().unwrap_or_default()
            ),
            Delivery::Browser if self.opened => format!(
                "Opened diff explanation in browser{suffix}.\nFile: {}",
                self.path.display()
            ),
            Delivery::Browser if self.editor == Editor::Cursor => format!(
                "Generated diff explanation{suffix}.\nFile: {}\n\n\
                 Please use the browser_navigate MCP tool to open this URL in Cursor browser:\n{}",
                self.path.display(),
                file_url(&self.path)
            ),
            Delivery::Browser => format!(
                "Generated diff explanation{suffix}.\nFile: {}",
                self.path.display()
            ),
        }
    }
}

#[derive(Debug, Default)]
pub struct ExplanationHost {
    settings: HostSettings,
    current: Mutex<Option<PublishedExplanation>>,
}

impl ExplanationHost {
    pub fn new(settings: HostSettings) -> Self {
        Self {
            settings,
            current: Mutex::new(None),
        }
    }

    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    /// Most recent successful publish.
    pub fn current(&self) -> Option<PublishedExplanation> {
        self.current.lock().clone()
    }

    /// Validate and publish with the configured delivery.
    pub fn publish(&self, request: &ExplainRequest) -> Result<PublishedExplanation, PublishError> {
        self.publish_as(request, self.settings.delivery)
    }

    pub fn publish_as(
        &self,
        request: &ExplainRequest,
        delivery: Delivery,
    ) -> Result<PublishedExplanation, PublishError> {
        validate_request(request)?;

        let published = match delivery {
            Delivery::Browser => self.write_document(request)?,
            Delivery::Panel => self.hand_off(request)?,
        };

        log::info!(
            "published explanation '{}' via {:?} to {}",
            request.title,
            delivery,
            published.path.display()
        );
        *self.current.lock() = Some(published.clone());
        Ok(published)
    }

    fn write_document(&self, request: &ExplainRequest) -> Result<PublishedExplanation, PublishError> {
        let html = render_document(request, self.settings.layout)?;

        std::fs::create_dir_all(&self.settings.output_dir)?;
        let filename = format!(
            "diff-explanation-{}.html",
            chrono::Utc::now().timestamp_millis()
        );
        let path = self.settings.output_dir.join(filename);
        std::fs::write(&path, html)?;

        let opened = self.settings.open_browser
            && request.editor != Editor::Cursor
            && match open::that(&path) {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("failed to open {} in browser: {err}", path.display());
                    false
                }
            };

        Ok(PublishedExplanation {
            delivery: Delivery::Browser,
            path,
            editor: request.editor,
            annotation_count: request.annotations.len(),
            opened,
            deep_link: None,
        })
    }

    fn hand_off(&self, request: &ExplainRequest) -> Result<PublishedExplanation, PublishError> {
        let mut request = request.clone();
        request.editor = handoff::panel_editor(request.editor);
        let pending = PendingExplanation::new(request);

        let dir = match &self.settings.handoff_dir {
            Some(dir) => dir.clone(),
            None => handoff::handoff_dir().map_err(PublishError::Handoff)?,
        };
        let path = handoff::save_pending_in(&dir, &pending).map_err(PublishError::Handoff)?;

        Ok(PublishedExplanation {
            delivery: Delivery::Panel,
            path,
            editor: pending.request.editor,
            annotation_count: pending.request.annotations.len(),
            opened: false,
            deep_link: Some(handoff::panel_deep_link(pending.request.editor)),
        })
    }
}
