//! Repository port for value-table persistence.
//!
//! This module defines the trait boundary between the domain and infrastructure
//! layers for storing and retrieving Q-tables.

use std::path::Path;

use crate::{Result, q_learning::QTable};

/// Port for persisting and loading value tables.
///
/// # Examples
///
/// ```no_run
/// use qttt::ports::ValueTableRepository;
/// use qttt::q_learning::QTable;
/// use std::path::Path;
///
/// fn checkpoint<R: ValueTableRepository>(
///     repo: &R,
///     table: &QTable,
///     path: &Path,
/// ) -> qttt::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait ValueTableRepository {
    /// Save a table to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the location cannot be written or serialization fails.
    fn save(&self, table: &QTable, path: &Path) -> Result<()>;

    /// Load a table from persistent storage.
    ///
    /// A missing or unreadable resource yields an empty table so training can
    /// always start cold. Implementations log the reason instead of failing.
    fn load(&self, path: &Path) -> QTable;
}

impl<R: ValueTableRepository + ?Sized> ValueTableRepository for &R {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        (**self).save(table, path)
    }

    fn load(&self, path: &Path) -> QTable {
        (**self).load(path)
    }
}

impl<R: ValueTableRepository + ?Sized> ValueTableRepository for Box<R> {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        (**self).save(table, path)
    }

    fn load(&self, path: &Path) -> QTable {
        (**self).load(path)
    }
}
