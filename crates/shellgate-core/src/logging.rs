//! Thread-safe file log sink.
//!
//! The sink is an explicit handle: open it at startup, pass clones to
//! whatever needs it, close it at shutdown. Write failures are swallowed so
//! logging can never affect command handling.

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{SecondsFormat, Utc};

/// Used when the requested log directory cannot be created.
const FALLBACK_LOG_FILE: &str = "./shellgate.log";

/// Severity tag written in front of each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }
}

/// Cloneable handle to an append-only log file.
#[derive(Debug, Clone)]
pub struct LogSink {
    file: Arc<Mutex<Option<File>>>,
    path: Option<PathBuf>,
}

/// Format current UTC time as RFC 3339 with milliseconds (e.g. 2026-02-04T10:15:30.123Z).
fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl LogSink {
    /// Create (truncating) the log file at `path` and write a header line.
    ///
    /// Falls back to `./shellgate.log` when the parent directory cannot be
    /// created. If no file can be opened the sink is disabled.
    pub fn open(path: &Path) -> Self {
        let mut target = path.to_path_buf();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!("Failed to create log directory {}: {}", dir.display(), e);
                target = PathBuf::from(FALLBACK_LOG_FILE);
            }
        }

        let file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&target)
        {
            Ok(file) => file,
            Err(e) => {
                log::warn!("Failed to open log file {}: {}", target.display(), e);
                return Self::disabled();
            }
        };

        let sink = Self {
            file: Arc::new(Mutex::new(Some(file))),
            path: Some(target),
        };
        sink.info(&format!("Logging started at {}", utc_timestamp()));
        sink
    }

    /// A sink that drops every line.
    pub fn disabled() -> Self {
        Self {
            file: Arc::new(Mutex::new(None)),
            path: None,
        }
    }

    /// Path actually written to, if enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.file
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Write a timestamped line (if the sink is open).
    pub fn log(&self, level: LogLevel, message: &str) {
        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "[{}] [{}] {}", utc_timestamp(), level.as_str(), message);
            let _ = file.flush();
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    /// Close the file. Later writes on any clone are dropped.
    pub fn close(&self) {
        self.file.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}
