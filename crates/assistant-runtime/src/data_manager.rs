//! Load-once access to the sales dataset.
//!
//! The file is read on the first call to [`DataManager::get`] and the result
//! is shared read-only for the rest of the process. A failed load is logged,
//! recorded in [`DataManager::last_error`], and replaced by an empty dataset
//! so the chat keeps running.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use assistant_core::error::AssistantError;
use assistant_core::models::Dataset;
use assistant_data::loader::load_dataset;

struct Loaded {
    dataset: Arc<Dataset>,
    error: Option<String>,
}

/// Lazily initialised, read-only handle to the dataset.
///
/// # Example
/// ```no_run
/// use assistant_runtime::data_manager::DataManager;
///
/// let mgr = DataManager::new(Some("Sales_data.xlsx".into()));
/// println!("{} rows", mgr.get().len());
/// ```
pub struct DataManager {
    /// File to load; `None` when discovery found nothing.
    data_path: Option<PathBuf>,
    loaded: OnceLock<Loaded>,
}

impl DataManager {
    pub fn new(data_path: Option<PathBuf>) -> Self {
        Self {
            data_path,
            loaded: OnceLock::new(),
        }
    }

    /// Build a manager around a dataset that is already in memory.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let loaded = OnceLock::new();
        let _ = loaded.set(Loaded {
            dataset: Arc::new(dataset),
            error: None,
        });
        Self {
            data_path: None,
            loaded,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// The dataset, loading it on first use.
    pub fn get(&self) -> Arc<Dataset> {
        Arc::clone(&self.loaded().dataset)
    }

    /// Human-readable description of the load failure, or `None`.
    pub fn last_error(&self) -> Option<&str> {
        self.loaded().error.as_deref()
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    /// `true` once the file has been read (successfully or not).
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn loaded(&self) -> &Loaded {
        self.loaded.get_or_init(|| self.load())
    }

    fn load(&self) -> Loaded {
        let result = match &self.data_path {
            Some(path) => load_dataset(path),
            None => Err(AssistantError::DataPathNotFound(PathBuf::from(
                "<no sales data file found>",
            ))),
        };
        match result {
            Ok(dataset) => {
                tracing::info!(rows = dataset.len(), "dataset ready");
                Loaded {
                    dataset: Arc::new(dataset),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed; continuing with no data");
                Loaded {
                    dataset: Arc::new(Dataset::empty()),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
