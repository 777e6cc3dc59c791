// src/import/mod.rs
//! Import: replace the local store with the contents of a backup file
//!
//! ```text
//! Detecting ─┬─ PlaintextParsing ───────────────┬─ Deserializing ─ Validating ─ Replacing ─ Done
//!            └─ AwaitingPassword ─ Decrypting ──┘
//! ```
//!
//! Any stage may end in `Failed`. The store is written exactly once, in
//! `Replacing`, and only after validation passed.

use std::fmt;

use tracing::{debug, info, warn};

use crate::container;
use crate::crypto;
use crate::db::RecordStore;
use crate::enums::ContainerKind;
use crate::error::{CoreError, CryptoError, ImportError};
use crate::export::normalize_password;
use crate::model::{validate, DatasetSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportStage {
    Detecting,
    PlaintextParsing,
    AwaitingPassword,
    Decrypting,
    Deserializing,
    Validating,
    Replacing,
    Done,
    Failed,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImportStage::Detecting => "detecting the backup format",
            ImportStage::PlaintextParsing => "reading the plaintext backup",
            ImportStage::AwaitingPassword => "waiting for the backup password",
            ImportStage::Decrypting => "decrypting",
            ImportStage::Deserializing => "reading records",
            ImportStage::Validating => "validating records",
            ImportStage::Replacing => "replacing local records",
            ImportStage::Done => "done",
            ImportStage::Failed => "failed",
        })
    }
}

/// Outcome of a successful import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub kind: ContainerKind,
    pub summary: DatasetSummary,
}

struct Progress<F> {
    stage: ImportStage,
    observer: F,
}

impl<F: FnMut(ImportStage)> Progress<F> {
    fn enter(&mut self, stage: ImportStage) {
        debug!(%stage, "import stage");
        self.stage = stage;
        (self.observer)(stage);
    }

    fn fail(&mut self, err: impl Into<CoreError>) -> ImportError {
        let err = ImportError::new(self.stage, err);
        warn!(stage = ?err.stage, error = %err.source, "import failed");
        (self.observer)(ImportStage::Failed);
        err
    }
}

/// Import `bytes` into `store`, replacing everything in it.
pub fn import_data<S: RecordStore + ?Sized>(
    store: &mut S,
    bytes: &[u8],
    password: Option<&str>,
) -> Result<ImportReport, ImportError> {
    import_data_with_progress(store, bytes, password, |_| {})
}

/// [`import_data`] that reports every stage transition to `observer`, for
/// driving a progress indicator while the key derivation runs.
pub fn import_data_with_progress<S, F>(
    store: &mut S,
    bytes: &[u8],
    password: Option<&str>,
    observer: F,
) -> Result<ImportReport, ImportError>
where
    S: RecordStore + ?Sized,
    F: FnMut(ImportStage),
{
    let mut progress = Progress {
        stage: ImportStage::Detecting,
        observer,
    };
    progress.enter(ImportStage::Detecting);

    let kind = container::detect(bytes).map_err(|e| progress.fail(e))?;

    let decrypted;
    let payload: &[u8] = match kind {
        ContainerKind::Plain => {
            progress.enter(ImportStage::PlaintextParsing);
            bytes
        }
        ContainerKind::Encrypted => {
            progress.enter(ImportStage::AwaitingPassword);
            let password = normalize_password(password)
                .ok_or(CryptoError::MissingPassword)
                .map_err(|e| progress.fail(e))?;
            let envelope = container::parse_envelope(bytes).map_err(|e| progress.fail(e))?;

            progress.enter(ImportStage::Decrypting);
            decrypted = crypto::decrypt(&envelope, &password).map_err(|e| progress.fail(e))?;
            decrypted.expose_secret().as_slice()
        }
    };

    progress.enter(ImportStage::Deserializing);
    let dataset = container::parse_plain(payload).map_err(|e| progress.fail(e))?;

    progress.enter(ImportStage::Validating);
    let dataset = validate(dataset).map_err(|e| progress.fail(e))?;
    let summary = dataset.summary();

    progress.enter(ImportStage::Replacing);
    store
        .replace_all_records(&dataset)
        .map_err(|e| progress.fail(e))?;

    progress.enter(ImportStage::Done);
    info!(kind = ?kind, "imported {summary}");
    Ok(ImportReport { kind, summary })
}
