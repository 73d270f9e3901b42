//! Turning an [`ExplainRequest`] into a self-contained HTML document.
//!
//! The diff is split per file, each fragment is rendered into a table in
//! both layouts, annotations are anchored and injected into every matching
//! table, and the page template stitches the result together. Apart from
//! the footer timestamp, rendering is a pure function of the request.

pub mod action;
pub mod anchor;
pub mod document;
pub mod inject;
pub mod validation;

pub use action::{cursor_prompt_link, decode_prompt, encode_prompt, encode_uri_component};
pub use anchor::{Anchor, matches_file, resolve_anchor};
pub use document::{PageContext, render_annotation_body};
pub use inject::inject_annotation;
pub use validation::{looks_like_shell_command, validate_request};

use chrono::{DateTime, Local};

use crate::domain::{Annotation, DiffLayout, Editor, ExplainRequest, RenderError};
use crate::infra::diff::{
    DiffTableRenderer, RenderedTable, UnidiffTableRenderer, split_diff_by_file,
};

/// Render `request` with the default table renderer, stamped with the
/// current local time.
pub fn render_document(
    request: &ExplainRequest,
    layout: DiffLayout,
) -> Result<String, RenderError> {
    render_document_at(request, layout, &UnidiffTableRenderer, Local::now())
}

/// Render `request`, opening in `layout`.
///
/// Both layouts are emitted so the page can switch without re-rendering.
/// Fragments that fail to render become an inline error section; only a
/// template failure fails the whole document.
pub fn render_document_at(
    request: &ExplainRequest,
    layout: DiffLayout,
    renderer: &dyn DiffTableRenderer,
    generated_at: DateTime<Local>,
) -> Result<String, RenderError> {
    let mut ctx = PageContext::new(request, layout, generated_at)?;

    let fragments = split_diff_by_file(&request.diff);
    ctx.file_count = fragments.len();

    if fragments.is_empty() {
        ctx.unified_files = document::EMPTY_DIFF_NOTICE.to_string();
        ctx.split_files = document::EMPTY_DIFF_NOTICE.to_string();
        return document::assemble_page(&ctx);
    }

    let mut rendered_names = Vec::with_capacity(fragments.len());
    for fragment in &fragments {
        for (target, out) in [
            (DiffLayout::LineByLine, &mut ctx.unified_files),
            (DiffLayout::SideBySide, &mut ctx.split_files),
        ] {
            match renderer.render(fragment, target) {
                Ok(mut table) => {
                    annotate_table(&mut table, &request.annotations, request.editor);
                    out.push_str(&document::render_file_section(&table));
                    if target == DiffLayout::LineByLine {
                        rendered_names.push(table.display_name);
                    }
                }
                Err(err) => {
                    log::warn!("failed to render diff fragment: {err}");
                    out.push_str(&document::render_error_section(fragment, &err));
                }
            }
        }
    }

    for annotation in &request.annotations {
        if !rendered_names
            .iter()
            .any(|name| matches_file(name, &annotation.file))
        {
            log::debug!("annotation for '{}' matches no file in the diff", annotation.file);
        }
    }

    document::assemble_page(&ctx)
}

/// Apply every matching annotation to `table`, in supplied order.
/// Returns how many annotations were injected.
pub fn annotate_table(
    table: &mut RenderedTable,
    annotations: &[Annotation],
    editor: Editor,
) -> usize {
    let mut applied = 0;
    for annotation in annotations {
        if !matches_file(&table.display_name, &annotation.file) {
            continue;
        }
        let Some(anchor) = resolve_anchor(&table.bodies, annotation.line) else {
            log::debug!(
                "no rows to anchor annotation for '{}' in {}",
                annotation.file,
                table.display_name
            );
            continue;
        };
        if let (Some(line), false) = (annotation.line, anchor.exact) {
            log::debug!(
                "line {line} not shown in {}; attaching annotation at end of file",
                table.display_name
            );
        }
        inject_annotation(table, anchor.row, &render_annotation_body(annotation, editor));
        applied += 1;
    }
    applied
}
