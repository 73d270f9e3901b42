use chrono::{Local, TimeZone};
use explain_changes::application::explain::{decode_prompt, render_document_at};
use explain_changes::application::host::{ExplanationHost, HostSettings};
use explain_changes::domain::{Action, Annotation, DiffLayout, Editor, ExplainRequest};
use explain_changes::infra::app_config::Delivery;
use explain_changes::infra::diff::UnidiffTableRenderer;
use explain_changes::infra::handoff::take_pending_in;

const TWO_FILES: &str = "diff --git a/src/auth.ts b/src/auth.ts\n\
index 1111111..2222222 100644\n\
--- a/src/auth.ts\n\
+++ b/src/auth.ts\n\
@@ -1,4 +1,5 @@\n\
\x20export function login(user) {\n\
-  return check(user);\n\
+  if (!user) return false;\n\
+  return check(user);\n\
\x20}\n\
\x20\n\
diff --git a/src/session.ts b/src/session.ts\n\
new file mode 100644\n\
index 0000000..3333333\n\
--- /dev/null\n\
+++ b/src/session.ts\n\
@@ -0,0 +1,2 @@\n\
+export const TTL = 3600;\n\
+export const NAME = 'sid';\n";

const BINARY: &str = "diff --git a/logo.png b/logo.png\n\
index 4444444..5555555 100644\n\
Binary files a/logo.png and b/logo.png differ\n";

const RENAMED: &str = "diff --git a/src/util.ts b/src/helpers.ts\n\
similarity index 100%\n\
rename from src/util.ts\n\
rename to src/helpers.ts\n";

const MALFORMED: &str = "diff --git garbage without paths\n";

const ROW_OPEN: &str = "<tr class=\"ai-annotation-row\">";
const HIDDEN: &str = "style=\"visibility: hidden;\"";

fn render(request: &ExplainRequest) -> String {
    let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    render_document_at(request, DiffLayout::SideBySide, &UnidiffTableRenderer, at)
        .expect("document renders")
}

fn request(diff: &str, annotations: Vec<Annotation>) -> ExplainRequest {
    let mut request = ExplainRequest::new("Harden login", diff);
    request.annotations = annotations;
    request
}

#[test]
fn annotations_land_in_every_layout_of_their_file() {
    let html = render(&request(
        TWO_FILES,
        vec![
            Annotation::new("auth.ts", Some(2), "guard against missing user"),
            Annotation::new("src/session.ts", None, "session constants"),
        ],
    ));

    // auth.ts: one unified row plus an aligned pair in the split view.
    // session.ts is new, so both views render it unified.
    assert_eq!(html.matches(ROW_OPEN).count(), 3 + 2);
    assert_eq!(html.matches(HIDDEN).count(), 1);
    assert!(html.contains("d2h-added-tag"));
}

#[test]
fn unmatched_annotation_is_dropped_quietly() {
    let html = render(&request(
        TWO_FILES,
        vec![Annotation::new("README.md", Some(1), "not in this diff")],
    ));
    assert_eq!(html.matches(ROW_OPEN).count(), 0);
    assert!(html.contains("src/auth.ts"));
}

#[test]
fn broken_file_does_not_take_others_down() {
    let diff = format!("{MALFORMED}{TWO_FILES}");
    let html = render(&request(
        &diff,
        vec![Annotation::new("auth.ts", Some(3), "still here")],
    ));
    assert!(html.contains("Error rendering diff"));
    assert_eq!(html.matches(ROW_OPEN).count(), 3);
}

#[test]
fn files_without_hunks_still_take_annotations() {
    let diff = format!("{RENAMED}{BINARY}{TWO_FILES}");
    let html = render(&request(
        &diff,
        vec![
            Annotation::new("helpers.ts", Some(1), "moved out of util"),
            Annotation::new("logo.png", None, "new brand colours"),
        ],
    ));

    assert!(!html.contains("Error rendering diff"));
    assert!(html.contains("src/util.ts → src/helpers.ts"));
    assert!(html.contains("File renamed without changes"));
    assert!(html.contains("Binary file not shown"));
    // Each file splits, so both annotations appear in three bodies.
    assert_eq!(html.matches(ROW_OPEN).count(), 2 * 3);
}

#[test]
fn action_prompt_survives_the_page() {
    let prompt = "Add a test for `login(null)`\n\"quoted\" ${template} → ü";
    let annotation = Annotation::new("auth.ts", Some(2), "guard")
        .with_action(Action::new("Add test", prompt));
    let html = render(&request(TWO_FILES, vec![annotation]));

    let payload = html
        .split("data-prompt=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("action button in page");
    assert!(
        payload
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
    );
    assert_eq!(decode_prompt(payload).unwrap(), prompt);
}

#[test]
fn host_publishes_browser_then_panel() {
    let dir = tempfile::tempdir().unwrap();
    let settings = HostSettings {
        output_dir: dir.path().join("pages"),
        open_browser: false,
        handoff_dir: Some(dir.path().join("handoff")),
        ..Default::default()
    };
    let host = ExplanationHost::new(settings);

    let mut req = request(
        TWO_FILES,
        vec![Annotation::new("auth.ts", Some(2), "guard")],
    );
    req.editor = Editor::Vscode;

    let page = host.publish(&req).unwrap();
    assert!(page.path.starts_with(dir.path().join("pages")));
    assert!(std::fs::read_to_string(&page.path).unwrap().contains("guard"));

    let panel = host.publish_as(&req, Delivery::Panel).unwrap();
    assert_eq!(
        panel.deep_link.as_deref(),
        Some("vscode://explain-changes.explain-changes-extension/show")
    );
    assert_eq!(host.current(), Some(panel));

    let pending = take_pending_in(&dir.path().join("handoff"))
        .unwrap()
        .expect("pending explanation");
    assert_eq!(pending.request.annotations.len(), 1);
}
