//! Inserting annotation rows into a rendered table.

use crate::infra::diff::{AnnotationRow, RenderedTable, Row};

/// Colspan used when a body has no first row to measure.
fn fallback_colspan(split: bool) -> usize {
    if split { 2 } else { 3 }
}

/// Insert one annotation row after `anchor` in every body of `table`.
///
/// Rows already injected right after the anchor are skipped, so repeated
/// anchors keep the order annotations were supplied in. In split layout the
/// content is shown only on the new (index 1) side; the old side gets a
/// hidden copy that keeps both columns the same height.
///
/// Returns the number of bodies that received a row.
pub fn inject_annotation(table: &mut RenderedTable, anchor: usize, html: &str) -> usize {
    let split = table.is_split();
    let mut injected = 0;

    for (idx, body) in table.bodies.iter_mut().enumerate() {
        if body.is_empty() {
            continue;
        }

        let mut at = anchor.min(body.len() - 1) + 1;
        while at < body.len() && body.rows[at].is_annotation() {
            at += 1;
        }

        let colspan = body
            .first_row_cell_count()
            .unwrap_or_else(|| fallback_colspan(split));
        body.rows.insert(
            at,
            Row::Annotation(AnnotationRow {
                colspan,
                visible: !split || idx == 1,
                html: html.to_string(),
            }),
        );
        injected += 1;
    }

    injected
}
