use super::*;
use crate::application::host::HostSettings;
use crate::infra::app_config::Delivery;
use pmcp::ToolHandler;
use serde_json::json;
use tokio_util::sync::CancellationToken;

const DIFF: &str = "diff --git a/src/a.ts b/src/a.ts\n\
--- a/src/a.ts\n\
+++ b/src/a.ts\n\
@@ -1,2 +1,2 @@\n\
\x20keep\n\
-old\n\
+new\n";

fn extra() -> pmcp::RequestHandlerExtra {
    pmcp::RequestHandlerExtra::new("test".into(), CancellationToken::new())
}

fn tool_in(dir: &std::path::Path, delivery: Delivery) -> impl ToolHandler {
    let config = Arc::new(ServerConfig {
        log_file: Some(dir.join("mcp.log")),
        no_open: true,
        ..Default::default()
    });
    let host = Arc::new(ExplanationHost::new(HostSettings {
        delivery,
        output_dir: dir.join("out"),
        open_browser: false,
        handoff_dir: Some(dir.join("handoff")),
        ..Default::default()
    }));
    tool::create_show_diff_explanation_tool(config, host)
}

#[tokio::test]
async fn test_show_diff_explanation_writes_page() {
    let tmp = tempfile::tempdir().expect("tmp dir");
    let tool = tool_in(tmp.path(), Delivery::Browser);

    let payload = json!({
        "title": "Swap old for new",
        "diff": DIFF,
        "editor": "vscode",
        "annotations": [
            { "file": "src/a.ts", "line": 2, "explanation": "the new value" }
        ]
    });
    let res = tool.handle(payload, extra()).await.expect("tool call ok");

    assert_eq!(res.get("status").and_then(|v| v.as_str()), Some("ok"));
    let message = res["message"].as_str().unwrap();
    assert!(message.starts_with("Generated diff explanation with 1 annotation."));

    let file = res["file"].as_str().unwrap();
    let html = std::fs::read_to_string(file).unwrap();
    assert!(html.contains("the new value"));

    let log = std::fs::read_to_string(tmp.path().join("mcp.log")).unwrap();
    assert!(log.contains("show_diff_explanation called"));
}

#[tokio::test]
async fn test_show_diff_explanation_panel_handoff() {
    let tmp = tempfile::tempdir().expect("tmp dir");
    let tool = tool_in(tmp.path(), Delivery::Panel);

    let payload = json!({
        "title": "Swap",
        "diff": DIFF,
        "workspacePath": "/work/project"
    });
    let res = tool.handle(payload, extra()).await.expect("tool call ok");

    assert_eq!(
        res["deep_link"].as_str(),
        Some("cursor://explain-changes.explain-changes-extension/show")
    );
    assert!(tmp.path().join("handoff").join("pending.json").exists());
}

#[tokio::test]
async fn test_show_diff_explanation_requires_title_and_diff() {
    let tmp = tempfile::tempdir().expect("tmp dir");
    let tool = tool_in(tmp.path(), Delivery::Browser);

    let err = tool
        .handle(json!({ "diff": DIFF }), extra())
        .await
        .expect_err("missing title");
    assert!(err.to_string().contains("'title' and 'diff' are required"));
    assert!(!tmp.path().join("out").exists());
}

#[tokio::test]
async fn test_show_diff_explanation_rejects_shell_command() {
    let tmp = tempfile::tempdir().expect("tmp dir");
    let tool = tool_in(tmp.path(), Delivery::Browser);

    let err = tool
        .handle(
            json!({ "title": "Oops", "diff": "cat /tmp/changes.diff" }),
            extra(),
        )
        .await
        .expect_err("shell command");
    assert!(err.to_string().contains("shell command"));
    assert!(matches!(err, pmcp::Error::Validation(_)));
}
