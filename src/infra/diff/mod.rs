//! Diff splitting, classification and table rendering.

pub mod renderer;
pub mod split;
pub mod table;

pub use renderer::{DiffTableRenderer, UnidiffTableRenderer};
pub use split::{FILE_HEADER, FileDiff, classify, normalize_path, split_diff_by_file};
pub use table::{AnnotationRow, BodySide, LineKind, RenderedTable, Row, TableBody};
