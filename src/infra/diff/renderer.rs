//! Turning one file fragment into a [`RenderedTable`].

use unidiff::{Hunk, PatchSet};

use super::split::{FILE_HEADER, FileDiff, normalize_path};
use super::table::{BodySide, LineKind, RenderedTable, Row, TableBody};
use crate::domain::{DiffLayout, DiffRenderError};

/// Renders a single-file fragment into table bodies.
///
/// Implementations must produce one body for [`DiffLayout::LineByLine`] and
/// two row-aligned bodies (old, new) for [`DiffLayout::SideBySide`].
pub trait DiffTableRenderer {
    fn render(&self, file: &FileDiff, layout: DiffLayout)
    -> Result<RenderedTable, DiffRenderError>;
}

/// Default renderer backed by the `unidiff` parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnidiffTableRenderer;

impl DiffTableRenderer for UnidiffTableRenderer {
    fn render(
        &self,
        file: &FileDiff,
        layout: DiffLayout,
    ) -> Result<RenderedTable, DiffRenderError> {
        if !has_hunks(&file.text)
            && let Some(table) = render_header_only(file, layout)
        {
            return Ok(table);
        }

        let mut patch_set = PatchSet::new();
        patch_set
            .parse(&file.text)
            .map_err(|e| DiffRenderError::Parse(e.to_string()))?;

        let patched = patch_set.files().first().ok_or(DiffRenderError::NoFile)?;
        let source = normalize_path(&patched.source_file);
        let target = normalize_path(&patched.target_file);
        let (display_name, path) = display_name(&source, &target, file);

        let layout = file.effective_layout(layout);
        let mut additions = 0;
        let mut deletions = 0;
        let bodies = match layout {
            DiffLayout::LineByLine => {
                let mut body = TableBody::new(BodySide::Unified);
                for hunk in patched.hunks() {
                    body.rows.push(info_row(hunk));
                    walk_hunk_lines(hunk, |kind, old, new, content| {
                        match kind {
                            LineKind::Insert => additions += 1,
                            LineKind::Delete => deletions += 1,
                            LineKind::Context => {}
                        }
                        body.rows.push(Row::Line {
                            kind,
                            old,
                            new,
                            content: content.to_string(),
                        });
                    });
                }
                vec![body]
            }
            DiffLayout::SideBySide => {
                let mut builder = SplitBuilder::default();
                for hunk in patched.hunks() {
                    builder.push_info(info_row(hunk));
                    walk_hunk_lines(hunk, |kind, old, new, content| {
                        match kind {
                            LineKind::Insert => additions += 1,
                            LineKind::Delete => deletions += 1,
                            LineKind::Context => {}
                        }
                        builder.push_line(kind, old, new, content);
                    });
                    builder.flush();
                }
                vec![builder.old, builder.new]
            }
        };

        let start_line = patched
            .hunks()
            .first()
            .map(|h| h.target_start as u32)
            .filter(|n| *n > 0)
            .unwrap_or(1);

        Ok(RenderedTable {
            display_name,
            path,
            start_line,
            layout,
            is_new_file: file.is_new_file,
            is_deleted_file: file.is_deleted_file,
            additions,
            deletions,
            bodies,
        })
    }
}

fn has_hunks(text: &str) -> bool {
    text.lines().any(|line| line.starts_with("@@"))
}

/// Paths from the `diff --git a/X b/Y` line, overridden by `rename from` /
/// `rename to` when present. The flag is true for renames.
fn header_paths(text: &str) -> Option<(String, String, bool)> {
    let header = text.lines().next()?.strip_prefix(FILE_HEADER)?.trim();
    let (source, target) = header.strip_prefix("a/")?.split_once(" b/")?;
    let mut source = source.to_string();
    let mut target = target.to_string();
    let mut renamed = false;

    for line in text.lines() {
        if let Some(from) = line.strip_prefix("rename from ") {
            source = from.trim().to_string();
            renamed = true;
        } else if let Some(to) = line.strip_prefix("rename to ") {
            target = to.trim().to_string();
            renamed = true;
        }
    }
    Some((source, target, renamed))
}

/// What a fragment without hunks changed.
fn header_summary(text: &str, file: &FileDiff, renamed: bool) -> &'static str {
    let has_line = |prefix: &str| text.lines().any(|line| line.starts_with(prefix));
    if has_line("Binary files ") || has_line("GIT binary patch") {
        "Binary file not shown"
    } else if renamed {
        "File renamed without changes"
    } else if file.is_new_file {
        "Empty file added"
    } else if file.is_deleted_file {
        "Empty file deleted"
    } else if has_line("old mode ") {
        "File mode changed"
    } else {
        "No content changes"
    }
}

/// Renames, binary files, empty files and mode changes carry a git header
/// but no `---`/`+++` lines. They render as one info row so annotations
/// still have somewhere to land.
fn render_header_only(file: &FileDiff, layout: DiffLayout) -> Option<RenderedTable> {
    let (source, target, renamed) = header_paths(&file.text)?;
    let (display_name, path) = display_name(&source, &target, file);
    let info = Row::Info {
        header: header_summary(&file.text, file, renamed).to_string(),
    };

    let layout = file.effective_layout(layout);
    let bodies = match layout {
        DiffLayout::LineByLine => vec![TableBody {
            side: BodySide::Unified,
            rows: vec![info],
        }],
        DiffLayout::SideBySide => vec![
            TableBody {
                side: BodySide::Old,
                rows: vec![info.clone()],
            },
            TableBody {
                side: BodySide::New,
                rows: vec![info],
            },
        ],
    };

    Some(RenderedTable {
        display_name,
        path,
        start_line: 1,
        layout,
        is_new_file: file.is_new_file,
        is_deleted_file: file.is_deleted_file,
        additions: 0,
        deletions: 0,
        bodies,
    })
}

fn is_dev_null(path: &str) -> bool {
    path == "/dev/null" || path == "dev/null"
}

/// Returns `(display_name, openable_path)`. Renames show `old → new`.
fn display_name(source: &str, target: &str, file: &FileDiff) -> (String, String) {
    if file.is_deleted_file || is_dev_null(target) || target.is_empty() {
        return (source.to_string(), source.to_string());
    }
    if !file.is_new_file && !is_dev_null(source) && !source.is_empty() && source != target {
        return (format!("{source} → {target}"), target.to_string());
    }
    (target.to_string(), target.to_string())
}

fn info_row(hunk: &Hunk) -> Row {
    let mut header = format!(
        "@@ -{},{} +{},{} @@",
        hunk.source_start, hunk.source_length, hunk.target_start, hunk.target_length
    );
    if !hunk.section_header.is_empty() {
        header.push(' ');
        header.push_str(hunk.section_header.trim());
    }
    Row::Info { header }
}

/// Walk a hunk's lines with their old/new line numbers.
/// "No newline at end of file" markers are skipped.
fn walk_hunk_lines<F>(hunk: &Hunk, mut f: F)
where
    F: FnMut(LineKind, Option<u32>, Option<u32>, &str),
{
    let mut old_line = hunk.source_start as u32;
    let mut new_line = hunk.target_start as u32;

    for line in hunk.lines() {
        let content = line.value.trim_end_matches(['\n', '\r']);
        match line.line_type.as_str() {
            unidiff::LINE_TYPE_ADDED => {
                f(LineKind::Insert, None, Some(new_line), content);
                new_line += 1;
            }
            unidiff::LINE_TYPE_REMOVED => {
                f(LineKind::Delete, Some(old_line), None, content);
                old_line += 1;
            }
            "\\" => {}
            _ => {
                f(LineKind::Context, Some(old_line), Some(new_line), content);
                old_line += 1;
                new_line += 1;
            }
        }
    }
}

/// Pairs deletion runs with the insertion runs that follow them so the
/// two sides stay row-aligned, padding the shorter side with empty rows.
#[derive(Debug)]
struct SplitBuilder {
    old: TableBody,
    new: TableBody,
    deleted: Vec<(u32, String)>,
    inserted: Vec<(u32, String)>,
}

impl Default for SplitBuilder {
    fn default() -> Self {
        Self {
            old: TableBody::new(BodySide::Old),
            new: TableBody::new(BodySide::New),
            deleted: Vec::new(),
            inserted: Vec::new(),
        }
    }
}

impl SplitBuilder {
    fn push_info(&mut self, row: Row) {
        self.flush();
        self.old.rows.push(row.clone());
        self.new.rows.push(row);
    }

    fn push_line(&mut self, kind: LineKind, old: Option<u32>, new: Option<u32>, content: &str) {
        match (kind, old, new) {
            (LineKind::Delete, Some(n), _) => {
                if !self.inserted.is_empty() {
                    self.flush();
                }
                self.deleted.push((n, content.to_string()));
            }
            (LineKind::Insert, _, Some(n)) => self.inserted.push((n, content.to_string())),
            _ => {
                self.flush();
                let row = Row::Line {
                    kind: LineKind::Context,
                    old,
                    new,
                    content: content.to_string(),
                };
                self.old.rows.push(row.clone());
                self.new.rows.push(row);
            }
        }
    }

    fn flush(&mut self) {
        let deleted = std::mem::take(&mut self.deleted);
        let inserted = std::mem::take(&mut self.inserted);
        let pairs = deleted.len().max(inserted.len());
        let mut deleted = deleted.into_iter();
        let mut inserted = inserted.into_iter();
        for _ in 0..pairs {
            self.old.rows.push(match deleted.next() {
                Some((n, content)) => Row::Line {
                    kind: LineKind::Delete,
                    old: Some(n),
                    new: None,
                    content,
                },
                None => Row::Empty,
            });
            self.new.rows.push(match inserted.next() {
                Some((n, content)) => Row::Line {
                    kind: LineKind::Insert,
                    old: None,
                    new: Some(n),
                    content,
                },
                None => Row::Empty,
            });
        }
    }
}
