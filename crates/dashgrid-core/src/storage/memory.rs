//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// An optional byte quota makes writes fail the way a full browser store does.
#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
    quota: RwLock<Option<usize>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory storage that rejects writes growing it past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::default();
        if let Ok(mut quota) = storage.quota.write() {
            *quota = Some(bytes);
        }
        storage
    }

    /// Change or lift the byte quota.
    pub fn set_quota(&self, bytes: Option<usize>) -> StorageResult<()> {
        let mut quota = self
            .quota
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        *quota = bytes;
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let quota = *self
            .quota
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;

        if let Some(limit) = quota {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded(format!(
                    "{} bytes needed, {} allowed",
                    needed, limit
                )));
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_and_read() {
        let storage = MemoryStorage::new();
        storage.write("layout", "[]").unwrap();
        assert_eq!(storage.read("layout").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_missing_key_reads_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("nonexistent").unwrap(), None);
        assert!(!storage.exists("nonexistent").unwrap());
    }

    #[test]
    fn test_write_replaces() {
        let storage = MemoryStorage::new();
        storage.write("layout", "[1]").unwrap();
        storage.write("layout", "[2]").unwrap();
        assert_eq!(storage.read("layout").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.write("layout", "[]").unwrap();
        storage.remove("layout").unwrap();
        assert!(!storage.exists("layout").unwrap());
        storage.remove("layout").unwrap();
    }

    #[test]
    fn test_quota_exceeded_keeps_old_value() {
        let storage = MemoryStorage::with_quota(10);
        storage.write("k", "1234").unwrap();
        let result = storage.write("k", "0123456789");
        assert!(matches!(result, Err(StorageError::QuotaExceeded(_))));
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("1234"));

        storage.set_quota(None).unwrap();
        storage.write("k", "0123456789").unwrap();
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("0123456789"));
    }
}
