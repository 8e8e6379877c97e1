//! Store data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Process index scoping a tag, 1-based.
pub type ProcessId = u32;

/// Timestamped scalar held by one tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagValue {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl TagValue {
    pub fn now(value: f64) -> Self {
        Self {
            value,
            timestamp: Utc::now(),
        }
    }
}

/// One row of the tag table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRow {
    pub process_id: ProcessId,
    pub tag: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

impl TagRow {
    pub fn tag_value(&self) -> TagValue {
        TagValue {
            value: self.value,
            timestamp: self.timestamp,
        }
    }
}
