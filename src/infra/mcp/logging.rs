use super::config::ServerConfig;
use chrono::Local;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

fn timestamped_line(message: &str) -> String {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{now}] {message}")
}

fn default_log_path() -> PathBuf {
    let date = Local::now().format("%Y-%m-%d").to_string();
    let dir = PathBuf::from(".explain-changes/logs");
    let _ = fs::create_dir_all(&dir);
    dir.join(format!("mcp-{date}.log"))
}

/// Only writes when a log file was configured or the default log directory
/// is already there; the server must never litter the user's project.
fn resolve_log_path(config: &ServerConfig) -> Option<PathBuf> {
    if let Some(ref path) = config.log_file {
        return Some(path.clone());
    }
    PathBuf::from(".explain-changes")
        .is_dir()
        .then(default_log_path)
}

pub(super) fn log_to_file(config: &ServerConfig, message: &str) {
    log::debug!("{message}");
    let Some(path) = resolve_log_path(config) else {
        return;
    };
    let line = timestamped_line(message);
    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| writeln!(f, "{line}"));
}
