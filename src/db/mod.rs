// src/db/mod.rs
//! Local record store: the persistence collaborator of the backup engine

mod sqlite;
mod store;

pub use sqlite::SqliteStore;
pub use store::{MemoryStore, RecordStore};
