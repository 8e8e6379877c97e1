//! In-process tag store.

use crate::error::{StoreError, StoreResult};
use crate::types::{ProcessId, TagRow, TagValue};
use crate::StateStore;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Tag table held in memory behind a lock.
///
/// Cheap to share by reference between the simulator and test doubles of
/// the PLC emulators.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tags: RwLock<BTreeMap<(ProcessId, String), TagValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated tags.
    pub fn len(&self) -> StoreResult<usize> {
        let tags = self.tags.read().map_err(|_| poisoned())?;
        Ok(tags.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove a tag so later reads report it absent.
    pub fn remove(&self, process: ProcessId, tag: &str) -> StoreResult<Option<TagValue>> {
        let mut tags = self.tags.write().map_err(|_| poisoned())?;
        Ok(tags.remove(&(process, tag.to_string())))
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable {
        message: "memory store lock poisoned".to_string(),
    }
}

impl StateStore for MemoryStore {
    fn read(&self, process: ProcessId, tag: &str) -> StoreResult<Option<TagValue>> {
        let tags = self.tags.read().map_err(|_| poisoned())?;
        Ok(tags.get(&(process, tag.to_string())).copied())
    }

    fn write(&self, value: f64, process: ProcessId, tag: &str) -> StoreResult<()> {
        if !value.is_finite() {
            return Err(StoreError::NonFinite {
                process,
                tag: tag.to_string(),
                value,
            });
        }
        let mut tags = self.tags.write().map_err(|_| poisoned())?;
        tags.insert((process, tag.to_string()), TagValue::now(value));
        Ok(())
    }

    fn rows(&self) -> StoreResult<Vec<TagRow>> {
        let tags = self.tags.read().map_err(|_| poisoned())?;
        Ok(tags
            .iter()
            .map(|((process_id, tag), v)| TagRow {
                process_id: *process_id,
                tag: tag.clone(),
                value: v.value,
                timestamp: v.timestamp,
            })
            .collect())
    }
}
