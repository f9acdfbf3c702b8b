use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

const LOG_FILE_NAME: &str = "furqaan-search.log";
const ARCHIVE_PREFIX: &str = "furqaan-search-";
const MAX_LOG_BYTES: u64 = 1_000_000;
const MAX_ARCHIVES: usize = 5;

static LOGGER: OnceLock<FileLogger> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut file) = self.file.lock() else {
            return;
        };

        let line = format!(
            "[{}] [{}] {}: {}\n",
            now_secs(),
            record.level(),
            record.target(),
            record.args()
        );
        let _ = file.write_all(line.as_bytes());
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

impl FileLogger {
    /// Opens the active log in `log_dir`, archiving it first once it has
    /// grown past the size cap.
    fn open(log_dir: &Path, level: LevelFilter) -> Result<Self, std::io::Error> {
        fs::create_dir_all(log_dir)?;
        let active = log_dir.join(LOG_FILE_NAME);
        if Self::is_oversized(&active)? {
            Self::archive(&active, log_dir)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&active)?;
        Ok(Self {
            file: Mutex::new(file),
            level,
        })
    }

    fn is_oversized(active: &Path) -> Result<bool, std::io::Error> {
        match fs::metadata(active) {
            Ok(meta) => Ok(meta.len() >= MAX_LOG_BYTES),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn archive(active: &Path, log_dir: &Path) -> Result<(), std::io::Error> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        fs::rename(active, log_dir.join(format!("{ARCHIVE_PREFIX}{stamp}.log")))?;

        // Archive names sort oldest first.
        let mut archives: Vec<PathBuf> = fs::read_dir(log_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(ARCHIVE_PREFIX))
                    .is_some_and(|rest| rest.ends_with(".log"))
            })
            .collect();
        archives.sort();

        let excess = archives.len().saturating_sub(MAX_ARCHIVES);
        for stale in archives.drain(..excess) {
            let _ = fs::remove_file(stale);
        }
        Ok(())
    }
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

pub fn init(level: LevelFilter) -> Result<(), std::io::Error> {
    init_in(&logs_dir(), level)
}

/// Installs the file logger as the `log` backend. Only the first call in a
/// process takes effect.
pub fn init_in(log_dir: &Path, level: LevelFilter) -> Result<(), std::io::Error> {
    let logger = FileLogger::open(log_dir, level)?;
    if LOGGER.set(logger).is_ok() {
        if let Some(logger) = LOGGER.get() {
            if log::set_logger(logger).is_ok() {
                log::set_max_level(level);
            }
        }
    }

    install_panic_hook();
    Ok(())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            log::error!("panic at {location}: {payload}");
            log::logger().flush();
            prior(panic_info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_dir(label: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "furqaan-logging-{label}-{}-{unique}",
            std::process::id()
        ))
    }

    #[test]
    fn logs_dir_uses_stable_app_data_layout() {
        let dir = logs_dir();
        assert!(dir
            .to_string_lossy()
            .to_ascii_lowercase()
            .contains("furqaan-search"));
    }

    #[test]
    fn oversized_log_is_archived_and_old_archives_pruned() {
        let dir = unique_dir("rotate");
        fs::create_dir_all(&dir).unwrap();
        for i in 0..MAX_ARCHIVES + 2 {
            fs::write(dir.join(format!("{ARCHIVE_PREFIX}{i:03}.log")), b"old").unwrap();
        }
        let active = dir.join(LOG_FILE_NAME);
        fs::write(&active, vec![b'x'; MAX_LOG_BYTES as usize]).unwrap();

        FileLogger::open(&dir, LevelFilter::Info).unwrap();

        assert_eq!(fs::metadata(&active).unwrap().len(), 0);
        let archives = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(ARCHIVE_PREFIX))
            .count();
        assert_eq!(archives, MAX_ARCHIVES);
        assert!(!dir.join(format!("{ARCHIVE_PREFIX}000.log")).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn small_log_is_reused_in_place() {
        let dir = unique_dir("reuse");
        fs::create_dir_all(&dir).unwrap();
        let active = dir.join(LOG_FILE_NAME);
        fs::write(&active, b"earlier line\n").unwrap();

        FileLogger::open(&dir, LevelFilter::Debug).unwrap();

        assert_eq!(fs::read_to_string(&active).unwrap(), "earlier line\n");
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
        fs::remove_dir_all(&dir).unwrap();
    }
}
