//! Layout store: reads and writes the dashboard arrangement under one key.

use crate::config::DashboardConfig;
use crate::layout::{self, Arrangement};
use crate::storage::{Storage, StorageError, StorageResult};
use std::cell::Cell;
use std::sync::Arc;

/// How the last [`LayoutStore::load_with_report`] call obtained its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Nothing stored yet (first run).
    Missing,
    /// A valid arrangement was read.
    Loaded { widgets: usize },
    /// The stored value was unreadable or corrupt; an empty arrangement was
    /// substituted.
    Recovered { reason: String },
}

/// Persists a single [`Arrangement`] through a [`Storage`] backend.
pub struct LayoutStore<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Key the arrangement lives under.
    key: String,
    /// Set once the corruption diagnostic has been logged.
    corruption_reported: Cell<bool>,
}

impl<S: Storage> LayoutStore<S> {
    /// Create a layout store over `storage` using `key`.
    pub fn new(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            corruption_reported: Cell::new(false),
        }
    }

    /// Load the stored arrangement, falling back to empty.
    ///
    /// A missing key is the first-run state. A corrupt value is recovered to
    /// an empty arrangement; the diagnostic is logged once per store.
    pub fn load(&self) -> Arrangement {
        self.load_with_report().0
    }

    /// Like [`load`](Self::load), also reporting how the result was obtained.
    pub fn load_with_report(&self) -> (Arrangement, LoadReport) {
        let raw = match self.storage.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("No saved layout under '{}'", self.key);
                return (Arrangement::new(), LoadReport::Missing);
            }
            Err(e) => return self.recover(e.to_string()),
        };

        match Arrangement::from_json(&raw) {
            Ok(arrangement) => {
                log::info!(
                    "Loaded layout '{}' with {} widgets",
                    self.key,
                    arrangement.len()
                );
                let widgets = arrangement.len();
                (arrangement, LoadReport::Loaded { widgets })
            }
            Err(e) => self.recover(e.to_string()),
        }
    }

    fn recover(&self, reason: String) -> (Arrangement, LoadReport) {
        if !self.corruption_reported.replace(true) {
            log::warn!(
                "Discarding unreadable layout '{}', starting empty: {}",
                self.key,
                reason
            );
        }
        (Arrangement::new(), LoadReport::Recovered { reason })
    }

    /// Serialize and write the arrangement, replacing the previous value.
    pub fn save(&self, arrangement: &Arrangement) -> StorageResult<()> {
        arrangement
            .validate()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let json = arrangement
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        self.storage.write(&self.key, &json)?;
        log::info!("Saved layout '{}' with {} widgets", self.key, arrangement.len());
        Ok(())
    }

    /// Remove the stored arrangement.
    pub fn clear(&self) -> StorageResult<()> {
        self.storage.remove(&self.key)
    }

    /// Next free widget counter for `arrangement`.
    pub fn next_widget_id(&self, arrangement: &Arrangement) -> u32 {
        layout::next_widget_id(arrangement)
    }

    /// Key the arrangement is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::LocalStorage>> {
    Ok(Arc::new(crate::storage::LocalStorage::new()?))
}

/// Convenience type alias for platform-specific storage.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = crate::storage::LocalStorage;

/// Type alias for the layout store with platform-specific storage.
pub type PlatformLayoutStore = LayoutStore<PlatformStorage>;

/// Convenience function to create a layout store with default storage.
pub fn create_layout_store(config: &DashboardConfig) -> StorageResult<PlatformLayoutStore> {
    let storage = create_default_storage()?;
    Ok(LayoutStore::new(storage, config.storage_key.clone()))
}
