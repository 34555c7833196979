//! Durable storage for the settings document.
//!
//! Backends deal in whole documents: `load_all` once at startup, `save_all`
//! after every mutation. There is no incremental update path.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::StorageConfig;

use super::types::{SettingsDocument, StorageResult};

/// Whole-document settings persistence
pub trait SettingsBackend: Send + Sync {
    /// Read every server's settings
    fn load_all(&self) -> StorageResult<SettingsDocument>;

    /// Overwrite the stored document
    fn save_all(&self, document: &SettingsDocument) -> StorageResult<()>;

    /// Backend name for logs and health output
    fn name(&self) -> &'static str;
}

/// JSON file backend; the document is an object keyed by server id
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SettingsBackend for JsonFileBackend {
    fn load_all(&self) -> StorageResult<SettingsDocument> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "No settings file found, starting empty");
            return Ok(SettingsDocument::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(SettingsDocument::new());
        }

        let document: SettingsDocument = serde_json::from_str(&raw)?;
        tracing::info!(
            path = %self.path.display(),
            guilds = document.len(),
            "Loaded settings file"
        );
        Ok(document)
    }

    fn save_all(&self, document: &SettingsDocument) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write-then-rename so a crash mid-write never truncates the document
        let json = serde_json::to_string_pretty(document)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        tracing::debug!(path = %self.path.display(), guilds = document.len(), "Saved settings file");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// In-memory backend for tests and throwaway runs
#[derive(Default)]
pub struct MemoryBackend {
    document: Mutex<SettingsDocument>,
    saves: AtomicU64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, as if loaded from disk
    pub fn with_document(document: SettingsDocument) -> Self {
        Self {
            document: Mutex::new(document),
            saves: AtomicU64::new(0),
        }
    }

    /// The most recently saved document
    pub fn saved(&self) -> SettingsDocument {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `save_all` calls so far
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

impl SettingsBackend for MemoryBackend {
    fn load_all(&self) -> StorageResult<SettingsDocument> {
        Ok(self.saved())
    }

    fn save_all(&self, document: &SettingsDocument) -> StorageResult<()> {
        *self.document.lock().unwrap_or_else(PoisonError::into_inner) = document.clone();
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Create a settings backend based on configuration.
///
/// - `"memory"`: settings live only as long as the process
/// - `"file"` (default): JSON document at `config.path`
pub fn create_settings_backend(config: &StorageConfig) -> Arc<dyn SettingsBackend> {
    match config.backend.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory settings backend");
            Arc::new(MemoryBackend::new())
        }
        other => {
            if other != "file" {
                tracing::warn!(
                    backend = %other,
                    "Unknown settings backend, falling back to file"
                );
            }
            tracing::info!(backend = "file", path = %config.path, "Creating file settings backend");
            Arc::new(JsonFileBackend::new(&config.path))
        }
    }
}
