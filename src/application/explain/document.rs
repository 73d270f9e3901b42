//! Page assembly: file sections, annotation markup and the page template.

use chrono::{DateTime, Local};
use handlebars::html_escape;
use serde::Serialize;

use super::action::render_action_buttons;
use crate::domain::{Annotation, DiffLayout, DiffRenderError, Editor, ExplainRequest, RenderError};
use crate::infra::diff::{FILE_HEADER, FileDiff, RenderedTable};
use crate::templates;

/// Inner markup of an annotation row.
pub fn render_annotation_body(annotation: &Annotation, editor: Editor) -> String {
    let mut html = String::from(
        r#"<div class="ai-annotation-content"><div class="ai-annotation-header"><span class="ai-annotation-label">Explanation</span>"#,
    );
    html.push_str(&format!(
        r#"<span class="ai-annotation-file">{}</span>"#,
        html_escape(&annotation.file)
    ));
    if let Some(line) = annotation.line {
        html.push_str(&format!(r#"<span class="ai-annotation-line">L{line}</span>"#));
    }
    html.push_str("</div>");
    html.push_str(&format!(
        r#"<p class="ai-annotation-text">{}</p>"#,
        html_escape(&annotation.explanation)
    ));
    if !annotation.actions.is_empty() {
        html.push_str(r#"<div class="ai-annotation-actions">"#);
        html.push_str(&render_action_buttons(&annotation.actions, editor));
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

fn file_tag(table: &RenderedTable) -> &'static str {
    if table.is_new_file {
        r#"<span class="d2h-tag d2h-added-tag">ADDED</span>"#
    } else if table.is_deleted_file {
        r#"<span class="d2h-tag d2h-deleted-tag">DELETED</span>"#
    } else if table.display_name != table.path {
        r#"<span class="d2h-tag d2h-moved-tag">RENAMED</span>"#
    } else {
        ""
    }
}

/// One file: header with an open-in-editor link, then the table.
pub fn render_file_section(table: &RenderedTable) -> String {
    let path = html_escape(&table.path);
    format!(
        concat!(
            r#"<div class="d2h-file-wrapper" data-file="{path}" data-layout="{layout}">"#,
            r#"<div class="d2h-file-header"><span class="d2h-file-name-wrapper"><span class="d2h-file-name">"#,
            r##"<a href="#" class="d2h-file-link" data-file="{path}" data-line="{line}" title="Open in editor">{name}</a>"##,
            r#"</span>{tag}</span><span class="d2h-file-stats"><span class="d2h-lines-added">+{add}</span><span class="d2h-lines-deleted">-{del}</span></span></div>"#,
            "{table}</div>"
        ),
        path = path,
        layout = table.layout,
        line = table.start_line,
        name = html_escape(&table.display_name),
        tag = file_tag(table),
        add = table.additions,
        del = table.deletions,
        table = table.to_html(),
    )
}

/// Placeholder for a fragment the table renderer could not handle.
pub fn render_error_section(fragment: &FileDiff, err: &DiffRenderError) -> String {
    let heading = fragment
        .text
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.strip_prefix(FILE_HEADER).unwrap_or(line).trim())
        .unwrap_or("diff");
    format!(
        r#"<div class="d2h-file-wrapper d2h-file-error"><div class="d2h-file-header"><span class="d2h-file-name">{}</span></div><div class="d2h-render-error">Error rendering diff: {}</div></div>"#,
        html_escape(heading),
        html_escape(&err.to_string()),
    )
}

pub const EMPTY_DIFF_NOTICE: &str = r#"<div class="empty-diff">No diff content</div>"#;

/// Everything the page template reads. Every field is always present since
/// the registry renders in strict mode.
#[derive(Debug, Serialize)]
pub struct PageContext {
    pub title: String,
    pub summary: String,
    pub editor: String,
    pub scheme: String,
    pub workspace: String,
    pub unified_active: bool,
    pub split_active: bool,
    pub global_actions: String,
    pub unified_files: String,
    pub split_files: String,
    pub annotations_json: String,
    pub file_count: usize,
    pub annotation_count: usize,
    pub generated_at: String,
}

impl PageContext {
    pub fn new(
        request: &ExplainRequest,
        layout: DiffLayout,
        generated_at: DateTime<Local>,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            title: request.title.clone(),
            summary: request.summary_text().unwrap_or_default().to_string(),
            editor: request.editor.to_string(),
            scheme: request.editor.scheme().to_string(),
            workspace: request.workspace_path.clone().unwrap_or_default(),
            unified_active: layout == DiffLayout::LineByLine,
            split_active: layout == DiffLayout::SideBySide,
            global_actions: render_action_buttons(&request.global_actions, request.editor),
            unified_files: String::new(),
            split_files: String::new(),
            annotations_json: embed_json(&request.annotations)?,
            file_count: 0,
            annotation_count: request.annotations.len(),
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}

/// JSON safe to place inside a `<script>` element.
pub fn embed_json<T: Serialize>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

pub fn assemble_page(ctx: &PageContext) -> Result<String, RenderError> {
    templates::render("explanation_page", ctx)
}
