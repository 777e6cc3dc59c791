// src/db/store.rs
//! The local record store as seen by the backup engine

use crate::error::StoreError;
use crate::model::Dataset;

/// Persistence collaborator: one snapshot read, one atomic replace.
pub trait RecordStore {
    /// A fully materialized, consistent snapshot of every record.
    fn read_all_records(&self) -> Result<Dataset, StoreError>;

    /// Swap the entire contents for `dataset`. Either every prior record is
    /// gone and every new one present, or this fails and nothing changed.
    fn replace_all_records(&mut self, dataset: &Dataset) -> Result<(), StoreError>;
}

/// In-memory store for tests and for embedding without a database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    dataset: Dataset,
    fail_replace: bool,
    replace_calls: usize,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    /// A store whose replace always fails, leaving its contents as they were.
    pub fn failing_replace(dataset: Dataset) -> Self {
        Self {
            dataset,
            fail_replace: true,
            replace_calls: 0,
        }
    }

    /// How many times `replace_all_records` was invoked, successful or not.
    pub fn replace_calls(&self) -> usize {
        self.replace_calls
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

impl RecordStore for MemoryStore {
    fn read_all_records(&self) -> Result<Dataset, StoreError> {
        Ok(self.dataset.clone())
    }

    fn replace_all_records(&mut self, dataset: &Dataset) -> Result<(), StoreError> {
        self.replace_calls += 1;
        if self.fail_replace {
            return Err(StoreError::Unavailable("replace disabled".into()));
        }
        self.dataset = dataset.clone();
        Ok(())
    }
}
