//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (tmp -> save, old save -> backup)
//! - Corruption detection and recovery from the backup

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    payload: &'a T,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    payload: serde_json::Value,
}

/// `<path>.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    with_suffix(path, ".tmp")
}

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, ".bak")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Write `value` atomically, keeping the previous file as a backup
pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
    }

    let envelope = Envelope {
        version: FORMAT_VERSION,
        payload: value,
    };
    let bytes = serde_json::to_vec_pretty(&envelope).map_err(|e| StorageError::json(path, e))?;

    let tmp = temp_path(path);
    fs::write(&tmp, bytes).map_err(|e| StorageError::io(&tmp, e))?;

    if path.exists() {
        let bak = backup_path(path);
        fs::rename(path, &bak).map_err(|e| StorageError::io(&bak, e))?;
    }
    fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;

    log::debug!("saved {}", path.display());
    Ok(())
}

/// Read one file without backup fallback
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let bytes = fs::read(path).map_err(|e| StorageError::io(path, e))?;
    let raw: RawEnvelope = serde_json::from_slice(&bytes).map_err(|e| StorageError::json(path, e))?;
    if raw.version != FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: raw.version,
            expected: FORMAT_VERSION,
        });
    }
    serde_json::from_value(raw.payload).map_err(|e| StorageError::json(path, e))
}

/// Read `path`, falling back to its backup when the primary is missing or
/// unreadable. The primary's error is returned if both fail.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    match load_file(path) {
        Ok(value) => Ok(value),
        Err(primary) => {
            let bak = backup_path(path);
            if !bak.exists() {
                return Err(primary);
            }
            match load_file(&bak) {
                Ok(value) => {
                    log::warn!("{primary}; recovered from {}", bak.display());
                    Ok(value)
                }
                Err(_) => Err(primary),
            }
        }
    }
}
