// src/lib.rs
//! trackamole-backup: encrypted backup import/export for Track-A-Mole records
//!
//! Features:
//! - Versioned single-file JSON container (`.json` plaintext, `.tam` encrypted)
//! - Argon2id + AES-256-GCM password protection
//! - Validated, all-or-nothing import into the local record store
//! - SQLite/SQLCipher local store and an in-memory store for tests
//! - Full secure-gate integration for passwords and derived keys

pub mod aliases;
pub mod config;
pub mod consts;
pub mod container;
pub mod crypto;
pub mod db;
pub mod enums;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod service;

// Re-export everything users need at the crate root
pub use aliases::{BackupPassword, PlainPayload};
pub use config::load as load_config;
pub use crypto::{EncryptedEnvelope, KdfParams};
pub use db::{MemoryStore, RecordStore, SqliteStore};
pub use enums::{AbcdeFlag, ConditionType, ContainerKind, Gender};
pub use error::{
    CoreError, CryptoError, ExportError, FormatError, ImportError, StoreError, UserMessage,
    ValidationError,
};
pub use export::{export_data, ExportOptions, ExportedFile};
pub use import::{import_data, import_data_with_progress, ImportReport, ImportStage};
pub use model::{Dataset, DatasetSummary, LesionCount, Mole, MoleEntry, Photo};
pub use service::BackupService;

pub type Result<T> = std::result::Result<T, CoreError>;
