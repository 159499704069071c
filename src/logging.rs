//! Structured logging module for Lisa
//!
//! Writes daily log files to the configured log directory with categories:
//! - MODE: Support mode activation, deactivation and responses
//! - AGENT: Model calls and reply routing
//! - SEARCH: Web search requests and provider failures
//! - VOICE: Speech output and input
//! - SESSION: Session lifecycle
//! - ERROR: Errors

use chrono::{Local, Utc};
use once_cell::sync::Lazy;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log categories for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    Mode,    // Support mode state changes and canned replies
    Agent,   // Model calls and routing
    Search,  // Web search
    Voice,   // TTS / STT
    Session, // Session lifecycle
    Error,   // Errors
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Mode => "MODE",
            LogCategory::Agent => "AGENT",
            LogCategory::Search => "SEARCH",
            LogCategory::Voice => "VOICE",
            LogCategory::Session => "SESSION",
            LogCategory::Error => "ERROR",
        }
    }
}

struct LogTarget {
    dir: PathBuf,
    echo: bool,
}

/// Global log target; `None` until `init_logging` runs
static LOG_TARGET: Lazy<Mutex<Option<LogTarget>>> = Lazy::new(|| Mutex::new(None));

/// Get today's log file path inside `dir`
fn log_file_path(dir: &Path) -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    dir.join(format!("lisa-{}.log", today))
}

/// Initialize the logging system - creates the log directory if needed.
/// With `echo` set, every line is also written to stderr.
pub fn init_logging(log_dir: &Path, echo: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    if let Ok(mut target) = LOG_TARGET.lock() {
        *target = Some(LogTarget {
            dir: log_dir.to_path_buf(),
            echo,
        });
    }

    log(LogCategory::Session, None, "Lisa logging initialized");

    Ok(())
}

/// Render one log line (without writing it)
pub fn format_line(category: LogCategory, session_id: Option<&str>, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let session_context = session_id
        .map(|id| {
            let short: String = id.chars().take(8).collect();
            format!("session={} | ", short)
        })
        .unwrap_or_default();

    format!(
        "[{}] [{}] {}{}\n",
        timestamp,
        category.as_str(),
        session_context,
        message
    )
}

/// Log a message with category and optional session context.
/// Does nothing before `init_logging`; write failures are swallowed.
pub fn log(category: LogCategory, session_id: Option<&str>, message: &str) {
    let guard = match LOG_TARGET.lock() {
        Ok(guard) => guard,
        Err(_) => return,
    };
    let target = match guard.as_ref() {
        Some(target) => target,
        None => return,
    };

    let log_line = format_line(category, session_id, message);

    if target.echo {
        eprint!("{}", log_line);
    }

    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(&target.dir))
    {
        let _ = file.write_all(log_line.as_bytes());
    }
}

pub fn log_mode(session_id: Option<&str>, message: &str) {
    log(LogCategory::Mode, session_id, message);
}

pub fn log_agent(session_id: Option<&str>, message: &str) {
    log(LogCategory::Agent, session_id, message);
}

pub fn log_search(session_id: Option<&str>, message: &str) {
    log(LogCategory::Search, session_id, message);
}

pub fn log_voice(session_id: Option<&str>, message: &str) {
    log(LogCategory::Voice, session_id, message);
}

pub fn log_session(session_id: Option<&str>, message: &str) {
    log(LogCategory::Session, session_id, message);
}

pub fn log_error(session_id: Option<&str>, message: &str) {
    log(LogCategory::Error, session_id, message);
}

/// Clean up old log files (keep last 7 days)
pub fn cleanup_old_logs(log_dir: &Path) -> Result<usize, Box<dyn std::error::Error + Send + Sync>> {
    let mut deleted = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(7);

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_lisa_log = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("lisa-") && n.ends_with(".log"))
            .unwrap_or(false);
        if !is_lisa_log {
            continue;
        }

        if let Ok(modified) = entry.metadata().and_then(|m| m.modified()) {
            let modified_time: chrono::DateTime<Utc> = modified.into();
            if modified_time < cutoff && fs::remove_file(&path).is_ok() {
                deleted += 1;
            }
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line_shortens_session() {
        let line = format_line(
            LogCategory::Mode,
            Some("0123456789abcdef"),
            "FU-2 Protection Mode activated",
        );
        assert!(line.contains("[MODE] session=01234567 | FU-2 Protection Mode activated"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_format_line_without_session() {
        let line = format_line(LogCategory::Error, None, "boom");
        assert!(line.contains("[ERROR] boom"));
    }

    #[test]
    fn test_cleanup_missing_dir_is_noop() {
        let dir = std::env::temp_dir().join(format!("lisa-missing-{}", uuid::Uuid::new_v4()));
        assert_eq!(cleanup_old_logs(&dir).unwrap(), 0);
    }
}
