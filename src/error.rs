// src/error.rs
//! Public error types for the entire crate
//!
//! Codec and crypto errors bubble unchanged to the orchestrator, which maps
//! them onto one of the two user-facing messages in [`UserMessage`].

use thiserror::Error;

use crate::import::ImportStage;

/// Structural problems inside an otherwise well-formed dataset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("entry {entry_id} references unknown mole {mole_id}")]
    DanglingMoleRef { entry_id: i64, mole_id: i64 },

    #[error("duplicate mole id {0}")]
    DuplicateMoleId(i64),

    #[error("duplicate entry id {0}")]
    DuplicateEntryId(i64),

    #[error("mole {0} has an empty label")]
    EmptyLabel(i64),

    #[error("{record} {id}: field `{field}` must be a finite number")]
    NonFinite {
        record: &'static str,
        id: i64,
        field: &'static str,
    },

    #[error("{record} {id}: field `{field}` is out of range")]
    OutOfRange {
        record: &'static str,
        id: i64,
        field: &'static str,
    },

    #[error("entry {entry_id} lists ABCDE flag {flag} more than once")]
    RepeatedAbcdeFlag { entry_id: i64, flag: char },

    #[error("entry {entry_id} has an invalid photo payload: {reason}")]
    InvalidPhoto { entry_id: i64, reason: String },

    /// A `blob:` URL names an object inside one browser session and cannot
    /// be carried in a file.
    #[error(
        "entry {entry_id} photo is a session-local blob: URL; \
         store it as a base64 data URL before exporting"
    )]
    BlobPhoto { entry_id: i64 },
}

/// Container-level failures. All are non-retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported backup version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("backup is corrupt: {0}")]
    Corrupt(String),

    #[error("backup does not match the expected schema: {0}")]
    SchemaMismatch(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Wrong password and tampered ciphertext are indistinguishable.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("backup is encrypted and no password was supplied")]
    MissingPassword,

    #[error("key derivation failed: {0}")]
    Kdf(String),

    #[error("encryption failed")]
    Encryption,
}

/// Failure of the local record store. Fatal for the current operation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("stored record is unreadable: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Store(StoreError::Sql(err))
    }
}

/// The only two messages an import failure is ever shown as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMessage {
    IncorrectPasswordOrCorrupt,
    UnsupportedVersion,
}

impl UserMessage {
    pub fn as_str(self) -> &'static str {
        match self {
            UserMessage::IncorrectPasswordOrCorrupt => "Incorrect password or corrupted file",
            UserMessage::UnsupportedVersion => "Unsupported backup version",
        }
    }
}

impl std::fmt::Display for UserMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An import that stopped in `stage`. The store was not touched unless
/// `stage` is [`ImportStage::Replacing`], and even then the store's own
/// atomicity guarantees nothing changed.
#[derive(Error, Debug)]
#[error("import failed while {stage}: {source}")]
pub struct ImportError {
    pub stage: ImportStage,
    #[source]
    pub source: CoreError,
}

impl ImportError {
    pub fn new(stage: ImportStage, source: impl Into<CoreError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// True when the caller should ask for a password and retry.
    pub fn needs_password(&self) -> bool {
        matches!(
            self.source,
            CoreError::Crypto(CryptoError::MissingPassword)
        )
    }

    pub fn user_message(&self) -> UserMessage {
        match self.source {
            CoreError::Format(FormatError::UnsupportedVersion { .. }) => {
                UserMessage::UnsupportedVersion
            }
            _ => UserMessage::IncorrectPasswordOrCorrupt,
        }
    }
}

/// Export never emits a partial file; any of these aborts it.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("local store could not be read: {0}")]
    Store(#[from] StoreError),

    #[error("in-memory dataset is invalid and cannot be exported: {0}")]
    InvalidDataset(#[from] ValidationError),

    #[error("serialization failed: {0}")]
    Format(#[from] FormatError),

    #[error("encryption failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
