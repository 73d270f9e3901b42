//! Table model for one rendered file diff.
//!
//! A unified table has a single body; a split table has an old (left) body
//! and a new (right) body that are kept row-for-row aligned. Rows know how
//! many `<td>` cells they emit and what their line-number cell displays,
//! which is all the annotation anchoring needs.

use handlebars::html_escape;
use std::fmt::Write;

use crate::domain::DiffLayout;

/// Which numbering a body's line-number cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySide {
    /// Single column; shows both numbers, anchors on the new one.
    Unified,
    /// Left column of a split table.
    Old,
    /// Right column of a split table.
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Insert,
    Delete,
}

impl LineKind {
    fn css_class(self) -> &'static str {
        match self {
            Self::Context => "d2h-cntx",
            Self::Insert => "d2h-ins",
            Self::Delete => "d2h-del",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Context => " ",
            Self::Insert => "+",
            Self::Delete => "-",
        }
    }
}

/// A row injected by the annotation pass. `html` is already escaped markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub colspan: usize,
    pub visible: bool,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// `@@ -a,b +c,d @@ section` header.
    Info { header: String },
    Line {
        kind: LineKind,
        old: Option<u32>,
        new: Option<u32>,
        content: String,
    },
    /// Split-layout padding opposite a line that has no counterpart.
    Empty,
    Annotation(AnnotationRow),
}

impl Row {
    /// Number of `<td>` elements this row emits in a body of `side`.
    pub fn cell_count(&self, side: BodySide) -> usize {
        match self {
            Row::Annotation(_) => 1,
            _ => match side {
                BodySide::Unified => 3,
                BodySide::Old | BodySide::New => 2,
            },
        }
    }

    /// Text shown in the line-number cell that anchoring reads. `None` for
    /// rows that have no such cell.
    ///
    /// The unified cell shows the new number, or the old one on deletions.
    /// That keeps lines of a deleted file addressable.
    pub fn line_number_text(&self, side: BodySide) -> Option<String> {
        match self {
            Row::Line { old, new, .. } => {
                let shown = match side {
                    BodySide::Old => *old,
                    BodySide::New => *new,
                    BodySide::Unified => new.or(*old),
                };
                Some(shown.map(|n| n.to_string()).unwrap_or_default())
            }
            Row::Info { .. } | Row::Empty => Some(String::new()),
            Row::Annotation(_) => None,
        }
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self, Row::Annotation(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBody {
    pub side: BodySide,
    pub rows: Vec<Row>,
}

impl TableBody {
    pub fn new(side: BodySide) -> Self {
        Self {
            side,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell count of the first row, which sizes full-width rows.
    pub fn first_row_cell_count(&self) -> Option<usize> {
        self.rows.first().map(|row| row.cell_count(self.side))
    }

    fn write_html(&self, out: &mut String) {
        out.push_str("<tbody class=\"d2h-diff-tbody\">");
        for row in &self.rows {
            write_row(out, row, self.side);
        }
        out.push_str("</tbody>");
    }
}

/// The rendered form of one file fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    /// Name shown in the file header; what annotations are matched against.
    pub display_name: String,
    /// Path opened by the header link.
    pub path: String,
    /// First new-file line of the first hunk, for the header link.
    pub start_line: u32,
    pub layout: DiffLayout,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
    pub additions: usize,
    pub deletions: usize,
    pub bodies: Vec<TableBody>,
}

impl RenderedTable {
    pub fn is_split(&self) -> bool {
        self.bodies.len() > 1
    }

    /// `<table>` markup for all bodies (without the file header).
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if self.is_split() {
            out.push_str("<div class=\"d2h-files-diff\">");
            for body in &self.bodies {
                out.push_str("<div class=\"d2h-file-side-diff\"><div class=\"d2h-code-wrapper\"><table class=\"d2h-diff-table\">");
                body.write_html(&mut out);
                out.push_str("</table></div></div>");
            }
            out.push_str("</div>");
        } else {
            out.push_str("<div class=\"d2h-file-diff\"><div class=\"d2h-code-wrapper\"><table class=\"d2h-diff-table\">");
            for body in &self.bodies {
                body.write_html(&mut out);
            }
            out.push_str("</table></div></div>");
        }
        out
    }
}

fn number_cell(out: &mut String, class: &str, number: Option<u32>) {
    let _ = write!(out, "<td class=\"{class}\">");
    if let Some(n) = number {
        let _ = write!(out, "{n}");
    }
    out.push_str("</td>");
}

fn write_row(out: &mut String, row: &Row, side: BodySide) {
    let number_class = match side {
        BodySide::Unified => "d2h-code-linenumber",
        BodySide::Old | BodySide::New => "d2h-code-side-linenumber",
    };

    match row {
        Row::Info { header } => {
            out.push_str("<tr>");
            for _ in 1..row.cell_count(side) {
                let _ = write!(out, "<td class=\"{number_class} d2h-info\"></td>");
            }
            let _ = write!(
                out,
                "<td class=\"d2h-info\"><div class=\"d2h-code-line\">{}</div></td></tr>",
                html_escape(header)
            );
        }
        Row::Line {
            kind,
            old,
            new,
            content,
        } => {
            let class = kind.css_class();
            out.push_str("<tr>");
            match side {
                BodySide::Unified => {
                    number_cell(out, &format!("{number_class} {class} line-num1"), *old);
                    number_cell(out, &format!("{number_class} {class} line-num2"), *new);
                }
                BodySide::Old => number_cell(out, &format!("{number_class} {class}"), *old),
                BodySide::New => number_cell(out, &format!("{number_class} {class}"), *new),
            }
            let _ = write!(
                out,
                "<td class=\"{class}\"><div class=\"d2h-code-line\"><span class=\"d2h-code-line-prefix\">{}</span><span class=\"d2h-code-line-ctn\">{}</span></div></td></tr>",
                kind.prefix(),
                html_escape(content)
            );
        }
        Row::Empty => {
            let _ = write!(
                out,
                "<tr><td class=\"{number_class} d2h-code-side-emptyplaceholder d2h-emptyplaceholder\"></td><td class=\"d2h-code-side-emptyplaceholder d2h-emptyplaceholder\"><div class=\"d2h-code-line\">&nbsp;</div></td></tr>"
            );
        }
        Row::Annotation(annotation) => {
            let _ = write!(
                out,
                "<tr class=\"ai-annotation-row\"><td colspan=\"{}\" class=\"ai-annotation-cell\">",
                annotation.colspan
            );
            if annotation.visible {
                out.push_str("<div class=\"ai-annotation\">");
            } else {
                out.push_str("<div class=\"ai-annotation\" style=\"visibility: hidden;\" aria-hidden=\"true\">");
            }
            out.push_str(&annotation.html);
            out.push_str("</div></td></tr>");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: LineKind, old: Option<u32>, new: Option<u32>) -> Row {
        Row::Line {
            kind,
            old,
            new,
            content: "x".to_string(),
        }
    }

    #[test]
    fn test_line_number_text_follows_side() {
        let row = line(LineKind::Context, Some(4), Some(7));
        assert_eq!(row.line_number_text(BodySide::Old).as_deref(), Some("4"));
        assert_eq!(row.line_number_text(BodySide::New).as_deref(), Some("7"));
        assert_eq!(row.line_number_text(BodySide::Unified).as_deref(), Some("7"));

        let deleted = line(LineKind::Delete, Some(4), None);
        assert_eq!(deleted.line_number_text(BodySide::Unified).as_deref(), Some("4"));
        assert_eq!(deleted.line_number_text(BodySide::New).as_deref(), Some(""));
        assert_eq!(Row::Empty.line_number_text(BodySide::New).as_deref(), Some(""));
    }

    #[test]
    fn test_cell_counts() {
        let row = line(LineKind::Insert, None, Some(1));
        assert_eq!(row.cell_count(BodySide::Unified), 3);
        assert_eq!(row.cell_count(BodySide::New), 2);
        let info = Row::Info {
            header: "@@ -1 +1 @@".to_string(),
        };
        assert_eq!(info.cell_count(BodySide::Unified), 3);

        let mut body = TableBody::new(BodySide::Old);
        assert_eq!(body.first_row_cell_count(), None);
        body.rows.push(info);
        assert_eq!(body.first_row_cell_count(), Some(2));
    }

    #[test]
    fn test_html_escapes_content() {
        let mut body = TableBody::new(BodySide::Unified);
        body.rows.push(Row::Line {
            kind: LineKind::Insert,
            old: None,
            new: Some(3),
            content: "<script>alert('x')</script>".to_string(),
        });
        let table = RenderedTable {
            display_name: "a.ts".to_string(),
            path: "a.ts".to_string(),
            start_line: 1,
            layout: DiffLayout::LineByLine,
            is_new_file: true,
            is_deleted_file: false,
            additions: 1,
            deletions: 0,
            bodies: vec![body],
        };
        let html = table.to_html();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert_eq!(html.matches("<tbody").count(), 1);
    }
}
