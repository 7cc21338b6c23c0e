//! Durable key-value storage
//!
//! The store treats its backend as an opaque string-to-string map.

use std::collections::BTreeMap;

use crate::error::StorageError;

/// Minimal durable key-value interface
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;

    /// All keys currently stored, in no particular order
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// In-memory store used natively and in tests.
///
/// An optional byte quota (sum of key and value lengths) makes writes fail
/// the way a full LocalStorage does.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used
    pub fn used(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            if self.used() - replaced + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Map a failed write to an error, using the thrown DOMException's name
/// when there is one
pub fn write_error(key: &str, exception: Option<&str>, reason: String) -> StorageError {
    match exception {
        // Firefox used its own name before adopting the standard one
        Some("QuotaExceededError") | Some("NS_ERROR_DOM_QUOTA_REACHED") => {
            StorageError::QuotaExceeded {
                key: key.to_string(),
            }
        }
        _ => StorageError::Write {
            key: key.to_string(),
            reason,
        },
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's LocalStorage
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        use wasm_bindgen::JsCast;

        self.storage.set_item(key, value).map_err(|e| {
            let name = e.dyn_ref::<web_sys::DomException>().map(|d| d.name());
            write_error(key, name.as_deref(), format!("{:?}", e))
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        let read_err = |e: wasm_bindgen::JsValue| StorageError::Read {
            key: "*".to_string(),
            reason: format!("{:?}", e),
        };
        let len = self.storage.length().map_err(read_err)?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(read_err)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basic() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);
        assert!(!store.contains("a").unwrap());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert!(store.contains("a").unwrap());
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_quota() {
        let mut store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap();
        assert_eq!(store.used(), 6);

        // Overwriting counts only the new value
        store.set("k", "123456789").unwrap();
        assert_eq!(store.used(), 10);

        let err = store.set("x", "1").unwrap_err();
        assert_eq!(err, StorageError::QuotaExceeded { key: "x".into() });
        assert_eq!(store.get("x").unwrap(), None);
    }

    #[test]
    fn test_write_error_classification() {
        assert_eq!(
            write_error("k", Some("QuotaExceededError"), String::new()),
            StorageError::QuotaExceeded { key: "k".into() }
        );
        assert_eq!(
            write_error("k", Some("NS_ERROR_DOM_QUOTA_REACHED"), String::new()),
            StorageError::QuotaExceeded { key: "k".into() }
        );
        // A message mentioning quota is not enough
        assert!(matches!(
            write_error("k", Some("SecurityError"), "Quota".into()),
            StorageError::Write { .. }
        ));
        assert!(matches!(
            write_error("k", None, "boom".into()),
            StorageError::Write { ref reason, .. } if reason == "boom"
        ));
    }

    #[test]
    fn test_memory_store_keys() {
        let mut store = MemoryStore::new();
        store.set("b", "").unwrap();
        store.set("a", "").unwrap();
        assert_eq!(store.keys().unwrap(), ["a", "b"]);
    }
}
