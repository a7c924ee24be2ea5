use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Log directory configuration
#[derive(Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        let log_dir = crate::utils::logs_dir().unwrap_or_else(|_| PathBuf::from("logs"));

        Self {
            log_dir,
            max_files: 7, // Keep 7 days of logs
        }
    }
}

/// Create a daily-rolling file appender for logs
pub fn create_file_appender(config: &LogConfig) -> Result<RollingFileAppender> {
    fs::create_dir_all(&config.log_dir)?;
    cleanup_old_logs(&config.log_dir, config.max_files)?;

    Ok(RollingFileAppender::new(
        Rotation::DAILY,
        &config.log_dir,
        "pulse.log",
    ))
}

/// Remove log files beyond the retention count, oldest first
fn cleanup_old_logs(log_dir: &Path, max_files: usize) -> Result<()> {
    let entries = fs::read_dir(log_dir)?;

    let mut log_files: Vec<_> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.is_file() && path.extension()? == "log" {
                let modified = fs::metadata(&path).ok()?.modified().ok()?;
                Some((path, modified))
            } else {
                None
            }
        })
        .collect();

    log_files.sort_by_key(|(_, modified)| *modified);

    if log_files.len() > max_files {
        for (path, _) in log_files.iter().take(log_files.len() - max_files) {
            if let Err(e) = fs::remove_file(path) {
                eprintln!("Failed to remove old log file {:?}: {}", path, e);
            }
        }
    }

    Ok(())
}

/// Get the current log file path
pub fn get_current_log_path(config: &LogConfig) -> PathBuf {
    config.log_dir.join("pulse.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_create_file_appender_creates_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = LogConfig {
            log_dir: temp_dir.path().join("logs"),
            max_files: 7,
        };

        let appender = create_file_appender(&config);
        assert!(appender.is_ok());
        assert!(config.log_dir.exists());
    }

    #[test]
    fn test_cleanup_removes_oldest_logs() {
        let temp_dir = TempDir::new().unwrap();

        for i in 0..5 {
            let path = temp_dir.path().join(format!("pulse.{}.log", i));
            File::create(&path).unwrap();
            // Stagger modification times so the sort is deterministic
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        cleanup_old_logs(temp_dir.path(), 2).unwrap();

        let remaining = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(remaining, 2);
    }
}
