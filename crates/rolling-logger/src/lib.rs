//! Rolling Logger
//!
//! Size-capped rolling log files plus an in-memory ring of the most recent
//! lines, wired into `tracing-subscriber`. `log` records are bridged into
//! the same subscriber, so library code can keep using the `log` macros.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::{self, format::Writer, time::FormatTime, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 5;
const DEFAULT_BUFFER_LINES: usize = 200;

/// Ring buffer of the global logger, set once by `init_logger`
static RECENT: OnceLock<Arc<Mutex<VecDeque<String>>>> = OnceLock::new();

/// Rotation and output settings
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    /// Rotate once the active file would grow past this size
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one
    pub max_files: usize,
    /// Lines kept in memory for `recent_lines`
    pub buffer_lines: usize,
    /// Mirror output to stderr
    pub stderr: bool,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            stderr: false,
            default_filter: "info".to_string(),
        }
    }
}

// ========================
// Rolling File Writer
// ========================

struct RollingState {
    dir: PathBuf,
    base_name: String,
    file: File,
    written: u64,
    max_bytes: u64,
    max_files: usize,
    recent: Arc<Mutex<VecDeque<String>>>,
    buffer_lines: usize,
}

impl RollingState {
    fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn rotated_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, n))
    }

    /// Shift `<name>.log.N-1` to `.N`, ..., `<name>.log` to `.1`, then reopen
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let keep = self.max_files.max(1);
        let oldest = self.rotated_path(keep);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..keep).rev() {
            let from = self.rotated_path(n);
            if from.exists() {
                fs::rename(&from, self.rotated_path(n + 1))?;
            }
        }
        fs::rename(self.current_path(), self.rotated_path(1))?;

        self.file = open_append(&self.current_path())?;
        self.written = 0;
        Ok(())
    }

    fn write_entry(&mut self, buf: &[u8]) -> io::Result<()> {
        let len = buf.len() as u64;
        if self.written > 0 && self.written + len > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += len;

        if let Ok(mut recent) = self.recent.lock() {
            for line in String::from_utf8_lossy(buf).lines() {
                if line.is_empty() {
                    continue;
                }
                if recent.len() == self.buffer_lines {
                    recent.pop_front();
                }
                recent.push_back(line.to_string());
            }
        }
        Ok(())
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Shared handle to a rolling log file; usable as a `MakeWriter`
#[derive(Clone)]
pub struct RollingFile {
    inner: Arc<Mutex<RollingState>>,
    recent: Arc<Mutex<VecDeque<String>>>,
}

impl RollingFile {
    /// Open (or create) `<dir>/<base_name>.log`
    pub fn new(dir: impl AsRef<Path>, base_name: &str, options: &LoggerOptions) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("{}.log", base_name));
        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        let recent = Arc::new(Mutex::new(VecDeque::with_capacity(options.buffer_lines)));

        let state = RollingState {
            dir,
            base_name: base_name.to_string(),
            file,
            written,
            max_bytes: options.max_bytes,
            max_files: options.max_files,
            recent: Arc::clone(&recent),
            buffer_lines: options.buffer_lines.max(1),
        };

        Ok(Self {
            inner: Arc::new(Mutex::new(state)),
            recent,
        })
    }

    /// Most recent lines written through this file, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        self.recent
            .lock()
            .map(|recent| recent.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Writer handed out per event by `RollingFile`
pub struct RollingWriter {
    inner: Arc<Mutex<RollingState>>,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "rolling log state poisoned"))?;
        state.write_entry(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "rolling log state poisoned"))?;
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFile {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Local wall-clock timestamps, millisecond precision
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

// ========================
// Global Logger
// ========================

/// Initialize the global logger with default options
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, LoggerOptions::default())
}

/// Initialize the global logger writing `<log_dir>/<app_name>.log`
///
/// Fails if a global subscriber is already installed.
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    options: LoggerOptions,
) -> Result<(), String> {
    let log_dir = log_dir.as_ref();
    let rolling = RollingFile::new(log_dir, app_name, &options)
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let file_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_target(true)
        .with_ansi(false)
        .with_writer(rolling.clone());

    let stderr_layer = options.stderr.then(|| {
        fmt::layer()
            .with_timer(LocalTimer)
            .with_target(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    RECENT
        .set(Arc::clone(&rolling.recent))
        .map_err(|_| "Logger already initialized".to_string())?;

    tracing::info!(target: "rolling_logger", dir = %log_dir.display(), "{} logger initialized", app_name);
    Ok(())
}

/// Most recent lines of the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    RECENT
        .get()
        .and_then(|recent| recent.lock().ok().map(|r| r.iter().cloned().collect()))
        .unwrap_or_default()
}

/// Log an info line; errors if the logger was never initialized
pub fn info(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::info!(target: "rolling_logger", "{}", message);
    Ok(())
}

/// Log an error line; errors if the logger was never initialized
pub fn error(message: &str) -> Result<(), String> {
    ensure_initialized()?;
    log::error!(target: "rolling_logger", "{}", message);
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    RECENT
        .get()
        .map(|_| ())
        .ok_or_else(|| "Logger not initialized".to_string())
}
