//! Splitting a multi-file unified diff into per-file fragments.

use crate::domain::DiffLayout;

/// Token that opens every per-file section of a git diff.
pub const FILE_HEADER: &str = "diff --git";

/// One file's slice of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub text: String,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
}

impl FileDiff {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let (is_new_file, is_deleted_file) = classify(&text);
        Self {
            text,
            is_new_file,
            is_deleted_file,
        }
    }

    /// Layout actually used for this file. One-sided diffs never split.
    pub fn effective_layout(&self, requested: DiffLayout) -> DiffLayout {
        if self.is_new_file || self.is_deleted_file {
            DiffLayout::LineByLine
        } else {
            requested
        }
    }
}

/// Split `diff` right before each [`FILE_HEADER`], keeping the header with
/// the fragment it opens. Preamble before the first header and blank
/// fragments are dropped; text without any header comes back as a single
/// fragment.
pub fn split_diff_by_file(diff: &str) -> Vec<FileDiff> {
    let mut starts: Vec<usize> = diff.match_indices(FILE_HEADER).map(|(i, _)| i).collect();
    if starts.is_empty() {
        starts.push(0);
    }

    let mut fragments = Vec::with_capacity(starts.len());
    for (idx, &start) in starts.iter().enumerate() {
        let end = starts.get(idx + 1).copied().unwrap_or(diff.len());
        let part = &diff[start..end];
        if !part.trim().is_empty() {
            fragments.push(FileDiff::new(part));
        }
    }
    fragments
}

/// Returns `(is_new_file, is_deleted_file)`. When both markers are present
/// the fragment is treated as a deletion.
pub fn classify(fragment: &str) -> (bool, bool) {
    let is_deleted = fragment.contains("+++ /dev/null") || fragment.contains("deleted file mode");
    let is_new = !is_deleted
        && (fragment.contains("--- /dev/null") || fragment.contains("new file mode"));
    (is_new, is_deleted)
}

/// Strip the single `a/` or `b/` prefix git puts on paths.
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    path.strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILES: &str = "diff --git a/src/a.ts b/src/a.ts\n\
index 1111111..2222222 100644\n\
--- a/src/a.ts\n\
+++ b/src/a.ts\n\
@@ -1,2 +1,2 @@\n\
\x20keep\n\
-old\n\
+new\n\
diff --git a/src/b.ts b/src/b.ts\n\
new file mode 100644\n\
--- /dev/null\n\
+++ b/src/b.ts\n\
@@ -0,0 +1,1 @@\n\
+hello\n";

    #[test]
    fn test_split_keeps_header_with_fragment() {
        let files = split_diff_by_file(TWO_FILES);
        assert_eq!(files.len(), 2);
        assert!(files[0].text.starts_with("diff --git a/src/a.ts"));
        assert!(files[1].text.starts_with("diff --git a/src/b.ts"));
        let joined: String = files.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(joined, TWO_FILES);
    }

    #[test]
    fn test_split_drops_blank_preamble() {
        let diff = format!("\n  \n{TWO_FILES}");
        let files = split_diff_by_file(&diff);
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_split_discards_preamble_text() {
        let diff = format!("commit abc\nAuthor: someone\n\n{TWO_FILES}");
        let files = split_diff_by_file(&diff);
        assert_eq!(files.len(), 2);
        assert!(files[0].text.starts_with(FILE_HEADER));
    }

    #[test]
    fn test_split_without_headers_returns_whole_input() {
        let diff = "--- a/x\n+++ b/x\n@@ -1 +1 @@\n-a\n+b\n";
        let files = split_diff_by_file(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].text, diff);
        assert!(split_diff_by_file("  \n\t").is_empty());
    }

    #[test]
    fn test_classify_markers() {
        let files = split_diff_by_file(TWO_FILES);
        assert!(!files[0].is_new_file && !files[0].is_deleted_file);
        assert!(files[1].is_new_file && !files[1].is_deleted_file);

        assert_eq!(classify("deleted file mode 100644\n+++ /dev/null"), (false, true));
        // Both markers: deletion wins.
        assert_eq!(classify("--- /dev/null\n+++ /dev/null"), (false, true));
    }

    #[test]
    fn test_new_and_deleted_files_force_unified() {
        let files = split_diff_by_file(TWO_FILES);
        assert_eq!(
            files[0].effective_layout(DiffLayout::SideBySide),
            DiffLayout::SideBySide
        );
        assert_eq!(
            files[1].effective_layout(DiffLayout::SideBySide),
            DiffLayout::LineByLine
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("b/src/lib.rs"), "src/lib.rs");
        assert_eq!(normalize_path(" a/x.rs "), "x.rs");
        assert_eq!(normalize_path("/dev/null"), "/dev/null");
    }

    #[test]
    fn test_normalize_path_keeps_directories_named_a_or_b() {
        assert_eq!(normalize_path("b/b/build.rs"), "b/build.rs");
        assert_eq!(normalize_path("a/a/x.rs"), "a/x.rs");
        assert_eq!(normalize_path("a/b/c.rs"), "b/c.rs");
    }
}
