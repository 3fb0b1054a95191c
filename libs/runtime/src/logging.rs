//! `tracing` setup driven by the `logging` config section.
//!
//! Every section yields up to two layers: human-readable console output and
//! JSON lines in a size-rotated file. A named section owns its target prefix
//! (`attendance` covers `attendance::domain::service`); the `default` section
//! gets every event no named section claims.

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use parking_lot::Mutex;
use tracing::{Level, Metadata};
use tracing_subscriber::{
    filter::FilterFn,
    fmt::{self, time::UtcTime, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use crate::config::{LoggingConfig, Section, DEFAULT_LOG_SECTION};
use crate::paths::resolve_under;

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. Relative log files resolve against `base_dir`.
/// A second call is a no-op.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // route `log` records from dependencies into tracing
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        let _ = tracing_subscriber::fmt()
            .with_timer(UtcTime::rfc_3339())
            .try_init();
        return;
    }

    let named: Vec<String> = cfg
        .keys()
        .filter(|name| name.as_str() != DEFAULT_LOG_SECTION)
        .cloned()
        .collect();
    let ansi = std::io::stdout().is_terminal();

    let mut layers: Vec<BoxedLayer> = Vec::new();
    for (name, section) in cfg {
        let scope = if name == DEFAULT_LOG_SECTION {
            Scope::Unclaimed(named.clone())
        } else {
            Scope::Prefix(name.clone())
        };

        if let Some(level) = parse_level(&section.console_level) {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_timer(UtcTime::rfc_3339())
                    .with_filter(scope.filter(level))
                    .boxed(),
            );
        }

        let file_level = if section.file_level.trim().is_empty() {
            &section.console_level
        } else {
            &section.file_level
        };
        if let (Some(level), Some(file)) = (parse_level(file_level), open_log_file(name, section, base_dir)) {
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(file)
                    .with_filter(scope.filter(level))
                    .boxed(),
            );
        }
    }

    let _ = Registry::default().with(layers).try_init();
}

/// `None` disables output; unknown names fall back to `info`.
fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" | "none" => None,
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => Some(Level::INFO),
    }
}

/// `target` is `prefix` itself or one of its `::` children.
fn target_in(target: &str, prefix: &str) -> bool {
    target
        .strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Which events a section receives.
#[derive(Debug, Clone)]
enum Scope {
    Prefix(String),
    /// Everything outside the listed prefixes.
    Unclaimed(Vec<String>),
}

impl Scope {
    fn covers(&self, target: &str) -> bool {
        match self {
            Scope::Prefix(prefix) => target_in(target, prefix),
            Scope::Unclaimed(claimed) => !claimed.iter().any(|p| target_in(target, p)),
        }
    }

    fn filter(&self, max: Level) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
        let scope = self.clone();
        FilterFn::new(move |meta: &Metadata<'_>| {
            *meta.level() <= max && scope.covers(meta.target())
        })
    }
}

/// Size-rotated log file shared by every writer handle.
#[derive(Clone)]
struct LogFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// `None` when the section has no file or the file cannot be opened; the
/// latter is reported on stderr since logging is not up yet.
fn open_log_file(name: &str, section: &Section, base_dir: &Path) -> Option<LogFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let path = resolve_under(section.file.trim(), base_dir);
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!(
                "logging: cannot create {} for section '{name}': {e}",
                parent.display()
            );
            return None;
        }
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let keep = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
    let rotate = FileRotate::new(
        &path,
        AppendTimestamp::default(FileLimit::MaxFiles(keep)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Some(LogFile(Arc::new(Mutex::new(rotate))))
}
