//! File-backed persistence for settings records.
//!
//! Each record type owns one file, `<root>/<key>.json`, holding the record
//! as pretty-printed JSON with field names matching the struct fields.
//! There is no partial-write protection; a torn write is tolerated because
//! loading treats unparseable content the same as a missing file.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while reading a backing file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed settings file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while writing a backing file.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Failed to create settings directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize settings record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolves the backing file path for a record key under `root`.
pub fn record_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{key}.json"))
}

/// Reads and deserializes the record stored at `path`.
///
/// Returns `Ok(None)` when no file exists; a missing file is a normal
/// first-run condition, not an error.
pub fn load_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, LoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let record = serde_json::from_str(&content).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(record))
}

/// Serializes `record` as pretty-printed JSON and writes it to `path`,
/// overwriting any existing file. Parent directories are created on demand.
pub fn persist_record<T: Serialize>(path: &Path, record: &T) -> Result<(), PersistError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = serde_json::to_string_pretty(record)?;
    std::fs::write(path, content).map_err(|source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
