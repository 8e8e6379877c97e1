//! Tag store persisted as a JSON document.
//!
//! Layout:
//!
//! ```json
//! { "rows": [ { "process_id": 1, "tag": "AI_LIT_101_LEVEL",
//!               "value": 0.5, "timestamp": "2026-01-01T00:00:00Z" } ] }
//! ```
//!
//! Values written by other testbed services may be JSON numbers, booleans or
//! numeric strings. Every read loads the file, so each read is a fresh
//! snapshot. A write holds an exclusive advisory lock on `<path>.lock` for
//! the whole load-modify-save cycle, so writers in other processes never
//! drop each other's tags. The new document goes to a uniquely named temp
//! file that is renamed over the original; readers never observe a partial
//! document and take no lock.

use crate::error::{StoreError, StoreResult};
use crate::types::{ProcessId, TagRow, TagValue};
use crate::StateStore;
use chrono::{DateTime, Utc};
use fslock::LockFile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::trace;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    rows: Vec<RawRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawRow {
    process_id: ProcessId,
    tag: String,
    value: Value,
    #[serde(default = "unix_epoch")]
    timestamp: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl RawRow {
    fn scalar(&self) -> StoreResult<f64> {
        let parsed = match &self.value {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(v) if v.is_finite() => Ok(v),
            _ => Err(StoreError::Malformed {
                process: self.process_id,
                tag: self.tag.clone(),
                value: self.value.to_string(),
            }),
        }
    }
}

/// File-backed tag table shared with other processes through the filesystem.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<StoreFile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreFile::default()),
            Err(source) => {
                return Err(StoreError::FileRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(StoreFile::default());
        }
        let file: StoreFile = serde_json::from_str(&content)?;
        trace!(path = %self.path.display(), rows = file.rows.len(), "loaded store");
        Ok(file)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Block until this writer owns the store. Released when the returned
    /// handle is dropped.
    fn lock(&self) -> StoreResult<LockFile> {
        let lock_path = self.lock_path();
        let lock_err = |source: std::io::Error| StoreError::Lock {
            path: lock_path.clone(),
            source,
        };
        fs::create_dir_all(self.dir()).map_err(lock_err)?;
        let mut lock = LockFile::open(lock_path.as_path()).map_err(|e| lock_err(e.into()))?;
        lock.lock().map_err(|e| lock_err(e.into()))?;
        Ok(lock)
    }

    fn save(&self, file: &StoreFile) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(file)?;
        let write_err = |source: std::io::Error| StoreError::FileWrite {
            path: self.path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        trace!(path = %self.path.display(), rows = file.rows.len(), "saved store");
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn read(&self, process: ProcessId, tag: &str) -> StoreResult<Option<TagValue>> {
        let file = self.load()?;
        // Last row wins if a foreign writer appended duplicates.
        match file
            .rows
            .iter()
            .rev()
            .find(|r| r.process_id == process && r.tag == tag)
        {
            Some(row) => Ok(Some(TagValue {
                value: row.scalar()?,
                timestamp: row.timestamp,
            })),
            None => Ok(None),
        }
    }

    fn write(&self, value: f64, process: ProcessId, tag: &str) -> StoreResult<()> {
        let number = serde_json::Number::from_f64(value).ok_or_else(|| StoreError::NonFinite {
            process,
            tag: tag.to_string(),
            value,
        })?;
        let _lock = self.lock()?;
        let mut file = self.load()?;
        let now = Utc::now();
        file.rows
            .retain(|r| !(r.process_id == process && r.tag == tag));
        file.rows.push(RawRow {
            process_id: process,
            tag: tag.to_string(),
            value: Value::Number(number),
            timestamp: now,
        });
        file.rows
            .sort_by(|a, b| (a.process_id, &a.tag).cmp(&(b.process_id, &b.tag)));
        self.save(&file)
    }

    fn rows(&self) -> StoreResult<Vec<TagRow>> {
        let file = self.load()?;
        let mut rows = Vec::with_capacity(file.rows.len());
        for raw in &file.rows {
            rows.push(TagRow {
                process_id: raw.process_id,
                tag: raw.tag.clone(),
                value: raw.scalar()?,
                timestamp: raw.timestamp,
            });
        }
        rows.sort_by(|a, b| (a.process_id, &a.tag).cmp(&(b.process_id, &b.tag)));
        Ok(rows)
    }
}
