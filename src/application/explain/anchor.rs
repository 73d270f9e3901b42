//! Locating the row an annotation attaches to.

use crate::infra::diff::TableBody;

/// Resolved attachment point inside a file's table bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Row index, valid for every body of the file.
    pub row: usize,
    /// False when the requested line was absent and the end of file was used.
    pub exact: bool,
}

/// Loose file match: either name contains the other.
///
/// Callers pass paths in whatever convention they have at hand (`src/a.ts`,
/// `a.ts`, `./src/a.ts` after normalization), so exact equality would drop
/// most annotations. A short name can therefore match several files.
pub fn matches_file(display_name: &str, file: &str) -> bool {
    display_name.contains(file) || file.contains(display_name)
}

/// Resolve the anchor row for `line` by scanning the last body.
///
/// The last body is the new-file side in split layout and the only body in
/// unified layout. Every row whose line-number cell reads `line` is a
/// candidate and the last one wins. Without a line, or without a match,
/// the anchor is the last original row of that body. Returns `None` when
/// there are no bodies or the last one has no original rows.
pub fn resolve_anchor(bodies: &[TableBody], line: Option<u32>) -> Option<Anchor> {
    let body = bodies.last()?;
    let fallback = body.rows.iter().rposition(|row| !row.is_annotation())?;

    let Some(line) = line else {
        return Some(Anchor {
            row: fallback,
            exact: false,
        });
    };

    let mut found = None;
    for (idx, row) in body.rows.iter().enumerate() {
        let Some(text) = row.line_number_text(body.side) else {
            continue;
        };
        if text.trim().parse::<u32>().ok() == Some(line) {
            found = Some(idx);
        }
    }

    Some(match found {
        Some(row) => Anchor { row, exact: true },
        None => Anchor {
            row: fallback,
            exact: false,
        },
    })
}
