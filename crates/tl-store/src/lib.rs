//! tl-store: shared tag state store used by the testbed.
//!
//! The store maps `(process id, tag name)` to a timestamped scalar. PLC
//! emulators and the physical process simulator write different tags of the
//! same store concurrently; implementations guarantee per-tag atomicity only.

pub mod error;
pub mod file;
pub mod memory;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use types::{ProcessId, TagRow, TagValue};

/// Read/write access to the shared tag table.
pub trait StateStore {
    /// Point-in-time read of one tag. `Ok(None)` when the tag was never written.
    fn read(&self, process: ProcessId, tag: &str) -> StoreResult<Option<TagValue>>;

    /// Overwrite one tag with a new value stamped with the current time.
    fn write(&self, value: f64, process: ProcessId, tag: &str) -> StoreResult<()>;

    /// All rows, ordered by process id then tag name.
    fn rows(&self) -> StoreResult<Vec<TagRow>>;
}

impl<S: StateStore + ?Sized> StateStore for &S {
    fn read(&self, process: ProcessId, tag: &str) -> StoreResult<Option<TagValue>> {
        (**self).read(process, tag)
    }

    fn write(&self, value: f64, process: ProcessId, tag: &str) -> StoreResult<()> {
        (**self).write(value, process, tag)
    }

    fn rows(&self) -> StoreResult<Vec<TagRow>> {
        (**self).rows()
    }
}
