//! JSON file implementation of the value-table repository.
//!
//! The file is a flat object of objects, `{"XX-OO----": {"2": 0.5}}`, so it
//! stays readable by other tools. Floats are written with the shortest
//! representation that parses back to the same bits.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, ports::ValueTableRepository, q_learning::QTable};

/// JSON-file value-table repository.
///
/// # Examples
///
/// ```no_run
/// use qttt::adapters::JsonFileRepository;
/// use qttt::ports::ValueTableRepository;
/// use qttt::q_learning::QTable;
/// use std::path::Path;
///
/// let repo = JsonFileRepository::new();
/// repo.save(&QTable::new(), Path::new("q_table.json"))?;
/// let table = repo.load(Path::new("q_table.json"));
/// # Ok::<(), qttt::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    pub fn new() -> Self {
        Self
    }

    /// Load, reporting why the table could not be read.
    pub fn try_load(&self, path: &Path) -> Result<QTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open value table {}", path.display()),
            source,
        })?;
        let table = serde_json::from_reader(BufReader::new(file))?;
        Ok(table)
    }
}

impl ValueTableRepository for JsonFileRepository {
    fn save(&self, table: &QTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {}", parent.display()),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create value table {}", path.display()),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, table)?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush value table {}", path.display()),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            states = table.state_count(),
            entries = table.size(),
            "saved value table"
        );
        Ok(())
    }

    fn load(&self, path: &Path) -> QTable {
        match self.try_load(path) {
            Ok(table) => {
                tracing::info!(
                    path = %path.display(),
                    states = table.state_count(),
                    "loaded value table"
                );
                table
            }
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no value table found, starting empty");
                QTable::new()
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "value table unreadable, starting empty"
                );
                QTable::new()
            }
        }
    }
}
