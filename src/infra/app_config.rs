use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::domain::{DiffLayout, Editor};

/// Where a rendered explanation is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    /// Write an HTML file and open it in the default browser.
    #[default]
    Browser,
    /// Write the pending handoff for the editor panel.
    Panel,
}

impl std::str::FromStr for Delivery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" | "html" => Ok(Self::Browser),
            "panel" | "extension" => Ok(Self::Panel),
            other => Err(format!("unknown delivery '{other}' (expected browser or panel)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub editor: Editor,
    pub layout: DiffLayout,
    pub delivery: Delivery,
    pub open_browser: bool,
    pub output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: Editor::default(),
            layout: DiffLayout::default(),
            delivery: Delivery::default(),
            open_browser: true,
            output_dir: None,
        }
    }
}

pub fn load_config() -> AppConfig {
    let path = config_path();
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|err| {
        log::warn!("ignoring invalid config at {}: {err}", path.display());
        AppConfig::default()
    })
}

pub fn save_config(config: &AppConfig) -> std::io::Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config).unwrap_or_default();
    std::fs::write(path, contents)
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("EXPLAIN_CHANGES_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_config_dir().join("config.toml")
}

fn app_config_dir() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("explain-changes");
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".explain-changes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("editor = \"cursor\"\ndelivery = \"panel\"\n").unwrap();
        assert_eq!(config.editor, Editor::Cursor);
        assert_eq!(config.delivery, Delivery::Panel);
        assert_eq!(config.layout, DiffLayout::SideBySide);
        assert!(config.open_browser);
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = AppConfig {
            editor: Editor::Vscode,
            layout: DiffLayout::LineByLine,
            delivery: Delivery::Browser,
            open_browser: false,
            output_dir: Some(PathBuf::from("/tmp/explanations")),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("layout = \"line-by-line\""));
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), config);
    }

    #[test]
    fn test_delivery_from_str() {
        assert_eq!("Panel".parse::<Delivery>().unwrap(), Delivery::Panel);
        assert!("email".parse::<Delivery>().is_err());
    }
}
