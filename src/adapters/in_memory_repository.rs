//! In-memory value-table repository for testing.
//!
//! This adapter provides a pure in-memory implementation of
//! ValueTableRepository, enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, ports::ValueTableRepository, q_learning::QTable};

/// In-memory repository for testing.
///
/// Stores serialized tables keyed by path. All clones share the same storage.
///
/// # Examples
///
/// ```
/// use qttt::adapters::InMemoryRepository;
/// use qttt::ports::ValueTableRepository;
/// use qttt::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&QTable::new(), Path::new("table"))?;
/// assert!(repo.contains(Path::new("table")));
/// # Ok::<(), qttt::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of tables currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored tables.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a table exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&path.to_string_lossy().to_string())
    }
}

impl ValueTableRepository for InMemoryRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();
        let bytes = serde_json::to_vec(table)?;
        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> QTable {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();
        match storage.get(&key) {
            Some(bytes) => serde_json::from_slice(bytes).unwrap_or_else(|err| {
                tracing::warn!(path = %key, error = %err, "stored table unreadable, starting empty");
                QTable::new()
            }),
            None => QTable::new(),
        }
    }
}
