use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use assistant_core::settings::APP_DIR_NAME;
use assistant_data::loader::is_supported;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

/// File names tried in the working directory before walking it.
pub const DEFAULT_DATA_FILES: [&str; 3] =
    ["Sales_data (1).xlsx", "Sales_data.xlsx", "sales_data.csv"];

/// How deep the working-directory walk descends.
const DISCOVERY_DEPTH: usize = 2;

const LOG_FILE_NAME: &str = "bi-assistant.log";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure `~/.bi-assistant/` and `~/.bi-assistant/logs/` exist.
///
/// Returns the application directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let app_dir = app_dir();
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(app_dir)
}

fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Default log destination for interactive runs.
pub fn default_log_file() -> PathBuf {
    app_dir().join("logs").join(LOG_FILE_NAME)
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to a `tracing` filter directive.
///
/// Unknown names pass through lowercased so `EnvFilter` directives such as
/// `assistant_runtime=trace` keep working.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" | "CRITICAL" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        _ => log_level.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, output is appended to that file without ANSI colours
/// so it never paints over the TUI. Otherwise it goes to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate the sales data file.
///
/// An explicit path is returned as-is, even when it does not exist, so the
/// loader can report it. Otherwise the well-known names are tried in `cwd`,
/// then `cwd` is walked (two levels, sorted by path) for the first supported
/// spreadsheet or CSV. Hidden directories are skipped.
pub fn discover_data_path(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Some(found) = DEFAULT_DATA_FILES
        .iter()
        .map(|name| cwd.join(name))
        .find(|p| p.is_file())
    {
        return Some(found);
    }

    WalkDir::new(cwd)
        .max_depth(DISCOVERY_DEPTH)
        .sort_by(|a, b| a.path().cmp(b.path()))
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .find(|p| is_supported(p))
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
