use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::types::Transaction;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("'{}' not found", path.display())]
    Missing { path: PathBuf },
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed csv in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl DatasetError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Loads the raw dataset. A missing file is reported as [`DatasetError::Missing`]
/// so callers can tell the user which step to run first.
pub fn read_transactions(path: impl AsRef<Path>) -> Result<Vec<Transaction>, DatasetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DatasetError::Missing {
            path: path.to_path_buf(),
        },
        _ => DatasetError::io(path, e),
    })?;

    let mut rdr = csv::Reader::from_reader(io::BufReader::new(file));
    let mut out = Vec::new();
    for row in rdr.deserialize::<Transaction>() {
        out.push(row.map_err(|e| DatasetError::csv(path, e))?);
    }
    tracing::debug!(path = %path.display(), rows = out.len(), "dataset loaded");
    Ok(out)
}

pub fn write_transactions(
    path: impl AsRef<Path>,
    transactions: &[Transaction],
) -> Result<(), DatasetError> {
    write_rows(path, transactions)
}

/// Writes any serializable rows as a headed CSV, creating the parent directory.
pub fn write_rows<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), DatasetError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|e| DatasetError::csv(path, e))?;
    for row in rows {
        wtr.serialize(row).map_err(|e| DatasetError::csv(path, e))?;
    }
    wtr.flush().map_err(|e| DatasetError::io(path, e))?;
    Ok(())
}
