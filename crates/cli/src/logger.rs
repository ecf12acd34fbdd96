//! File logger for the iconview CLI. Every run writes to its own file at
//! ~/.iconview/logs/{run_metadata}/log.

use anyhow::{Context, Result};
use chrono::Local;
use dirs::home_dir;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

pub struct IconviewLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl IconviewLogger {
    /// Create a logger writing to ~/.iconview/logs/{timestamp}_{uuid}/log,
    /// where {uuid} is the first group of a fresh v4 uuid.
    pub fn new(level: LevelFilter) -> Result<(Self, PathBuf)> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid_string = Uuid::new_v4().to_string();
        let uuid = uuid_string.split('-').next().unwrap_or("unknown");
        let run_id = format!("{timestamp}_{uuid}");

        let log_dir = Self::log_dir(&run_id)?;
        create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        let logger = Self {
            level,
            file: Mutex::new(file),
        };
        Ok((logger, log_path))
    }

    pub fn log_dir(run_id: &str) -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".iconview").join("logs").join(run_id))
    }

    /// Install the logger. Returns the log file path.
    pub fn init(level: LevelFilter) -> Result<PathBuf> {
        let (logger, log_path) = Self::new(level)?;

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("iconview logger initialized. Log file: {}", log_path.display());
        Ok(log_path)
    }
}

impl Log for IconviewLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
        let message = format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        );

        if let Ok(mut file) = self.file.lock() {
            // a failed log write must not fail the command
            let _ = writeln!(file, "{}", message);
            let _ = file.flush();
        }

        // stdout carries command output
        if record.level() <= Level::Warn {
            eprintln!("{}", message);
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Mark the start of a command in the log.
pub fn log_section(name: &str) {
    let separator = "=".repeat(50);
    log::info!("{}", separator);
    log::info!("SECTION: {}", name);
    log::info!("{}", separator);
}
