//! Shared in-memory job store.
//!
//! All reads and writes go through a single lock so pollers always
//! see a consistent record. Reads hand out snapshot clones; writers
//! mutate in place under the lock.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::JobRecord;

/// Thread-safe store of job records keyed by job ID.
#[derive(Clone, Default)]
pub struct JobStore {
    records: Arc<RwLock<HashMap<String, JobRecord>>>,
}

impl JobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record, replacing any previous record with the
    /// same ID.
    pub fn create(&self, record: JobRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    /// Get a snapshot of a record.
    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.records.read().get(job_id).cloned()
    }

    /// Mutate a record under the write lock.
    ///
    /// Returns false if the job is unknown. The closure runs while the
    /// lock is held, so keep it short.
    pub fn update_atomic<F>(&self, job_id: &str, f: F) -> bool
    where
        F: FnOnce(&mut JobRecord),
    {
        match self.records.write().get_mut(job_id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        }
    }

    /// Remove a record, returning it if present.
    pub fn remove(&self, job_id: &str) -> Option<JobRecord> {
        self.records.write().remove(job_id)
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
