use std::path::PathBuf;
use std::str::FromStr;

use crate::application::host::HostSettings;
use crate::domain::{DiffLayout, Editor, ExplainRequest};
use crate::infra::app_config::{AppConfig, Delivery};

/// Configuration for the MCP server, parsed from CLI arguments and
/// `EXPLAIN_CHANGES_*` environment variables. Unset fields fall back to
/// the persisted [`AppConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Browser document or panel handoff.
    pub delivery: Option<Delivery>,
    /// Directory rendered documents are written to.
    pub output_dir: Option<PathBuf>,
    /// Never launch the browser.
    pub no_open: bool,
    /// Optional path for debug log file.
    pub log_file: Option<PathBuf>,
    /// Editor assumed when a request says `auto`.
    pub editor: Option<Editor>,
    /// Layout the page opens in.
    pub layout: Option<DiffLayout>,
    /// Override for the panel handoff directory.
    pub handoff_dir: Option<PathBuf>,
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ServerConfig {
    /// Configuration from `EXPLAIN_CHANGES_*` environment variables alone.
    pub fn from_env() -> Self {
        Self::from_iter(std::iter::empty())
    }

    /// Parse server configuration from an iterator of strings.
    /// Environment variables are read first; arguments override them.
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = ServerConfig {
            delivery: parse_env("EXPLAIN_CHANGES_DELIVERY"),
            output_dir: std::env::var("EXPLAIN_CHANGES_OUTPUT_DIR").ok().map(PathBuf::from),
            no_open: std::env::var("EXPLAIN_CHANGES_NO_OPEN").is_ok_and(|v| is_truthy(&v)),
            log_file: std::env::var("EXPLAIN_CHANGES_LOG_FILE").ok().map(PathBuf::from),
            editor: parse_env("EXPLAIN_CHANGES_EDITOR"),
            layout: parse_env("EXPLAIN_CHANGES_LAYOUT"),
            handoff_dir: std::env::var("EXPLAIN_CHANGES_HANDOFF_DIR").ok().map(PathBuf::from),
        };

        let mut args = iter.into_iter().peekable();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--no-open" => config.no_open = true,
                "--delivery" | "--output-dir" | "--log-file" | "--editor" | "--layout"
                | "--handoff-dir" => {
                    let Some(value) = args.next_if(|v| !v.starts_with("--")) else {
                        continue;
                    };
                    config.set(&arg, value);
                }
                _ => {}
            }
        }

        config
    }

    fn set(&mut self, flag: &str, value: String) {
        match flag {
            "--delivery" => self.delivery = value.parse().ok(),
            "--output-dir" => self.output_dir = Some(PathBuf::from(value)),
            "--log-file" => self.log_file = Some(PathBuf::from(value)),
            "--editor" => self.editor = value.parse().ok(),
            "--layout" => self.layout = value.parse().ok(),
            "--handoff-dir" => self.handoff_dir = Some(PathBuf::from(value)),
            _ => {}
        }
    }

    /// Publishing settings: explicit server settings over the persisted config.
    pub fn host_settings(&self, app: &AppConfig) -> HostSettings {
        let mut settings = HostSettings::from(app);
        if let Some(delivery) = self.delivery {
            settings.delivery = delivery;
        }
        if let Some(layout) = self.layout {
            settings.layout = layout;
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if self.no_open {
            settings.open_browser = false;
        }
        settings.handoff_dir = self.handoff_dir.clone();
        settings
    }

    /// Fill in what the request left to the server.
    pub fn apply_defaults(&self, request: &mut ExplainRequest) {
        if request.editor == Editor::Auto
            && let Some(editor) = self.editor
        {
            request.editor = editor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_server_config_from_iter() {
        let config = ServerConfig::from_iter(args(&[
            "explain-changes",
            "serve",
            "--delivery",
            "panel",
            "--output-dir",
            "/tmp/out",
            "--log-file",
            "/tmp/debug.log",
            "--editor",
            "cursor",
            "--layout",
            "unified",
            "--no-open",
        ]));

        assert_eq!(config.delivery, Some(Delivery::Panel));
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/debug.log")));
        assert_eq!(config.editor, Some(Editor::Cursor));
        assert_eq!(config.layout, Some(DiffLayout::LineByLine));
        assert!(config.no_open);
    }

    #[test]
    fn test_server_config_incomplete_args() {
        let config = ServerConfig::from_iter(args(&["program_name", "--log-file"]));
        assert_eq!(config.log_file, None);

        let config = ServerConfig::from_iter(args(&["program_name", "--output-dir", "--no-open"]));
        assert_eq!(config.output_dir, None);
        assert!(config.no_open);
    }

    #[test]
    fn test_host_settings_layering() {
        let app = AppConfig {
            open_browser: true,
            layout: DiffLayout::LineByLine,
            ..Default::default()
        };
        let config = ServerConfig {
            no_open: true,
            output_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };
        let settings = config.host_settings(&app);
        assert!(!settings.open_browser);
        assert_eq!(settings.layout, DiffLayout::LineByLine);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.delivery, Delivery::Browser);
    }

    #[test]
    fn test_apply_defaults_only_fills_auto() {
        let config = ServerConfig {
            editor: Some(Editor::Vscode),
            ..Default::default()
        };
        let mut auto = ExplainRequest::new("t", "d");
        config.apply_defaults(&mut auto);
        assert_eq!(auto.editor, Editor::Vscode);

        let mut cursor = ExplainRequest::new("t", "d");
        cursor.editor = Editor::Cursor;
        config.apply_defaults(&mut cursor);
        assert_eq!(cursor.editor, Editor::Cursor);
    }
}
