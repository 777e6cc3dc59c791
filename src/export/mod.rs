// src/export/mod.rs
//! Export: snapshot the local store into a single backup file
//!
//! A plaintext export is the container document itself (`.json`). With a
//! password the document is sealed into an encrypted envelope (`.tam`).
//! An invalid in-memory dataset aborts the export: no bytes are produced.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{error, info};

use crate::aliases::BackupPassword;
use crate::consts::EXPORT_FILE_STEM;
use crate::container;
use crate::crypto::{self, KdfParams};
use crate::db::RecordStore;
use crate::enums::ContainerKind;
use crate::error::ExportError;
use crate::model::DatasetSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub kdf: KdfParams,
    /// Indent plaintext output; encrypted payloads are always compact
    pub pretty_json: bool,
}

/// A finished backup, ready to be saved or handed to a download sink
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub kind: ContainerKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub summary: DatasetSummary,
}

impl ExportedFile {
    /// Write into `dir` under the suggested name. The file appears complete
    /// or not at all.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let target = dir.join(&self.file_name);

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}

/// `trackamole-backup-2024-05-01.tam`
pub fn suggested_file_name(kind: ContainerKind, date: NaiveDate) -> String {
    format!(
        "{EXPORT_FILE_STEM}-{}.{}",
        date.format("%Y-%m-%d"),
        kind.extension()
    )
}

/// Blank or whitespace-only passwords mean "no password".
pub(crate) fn normalize_password(password: Option<&str>) -> Option<BackupPassword> {
    password
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| BackupPassword::new(p.to_owned()))
}

/// Read the full dataset from `store` and turn it into a backup file.
pub fn export_data<S: RecordStore + ?Sized>(
    store: &S,
    password: Option<&str>,
    options: &ExportOptions,
) -> Result<ExportedFile, ExportError> {
    let result = export_inner(store, password, options);
    if let Err(e) = &result {
        error!(error = %e, "export aborted");
    }
    result
}

fn export_inner<S: RecordStore + ?Sized>(
    store: &S,
    password: Option<&str>,
    options: &ExportOptions,
) -> Result<ExportedFile, ExportError> {
    let dataset = store.read_all_records()?;
    dataset.check()?;
    let summary = dataset.summary();

    let (kind, bytes) = match normalize_password(password) {
        None => {
            let bytes = if options.pretty_json {
                container::serialize_pretty(&dataset)?
            } else {
                container::serialize(&dataset)?
            };
            (ContainerKind::Plain, bytes)
        }
        Some(password) => {
            let plaintext = container::serialize(&dataset)?;
            let envelope = crypto::encrypt(&plaintext, &password, &options.kdf)?;
            (ContainerKind::Encrypted, container::encode_envelope(&envelope)?)
        }
    };

    let file_name = suggested_file_name(kind, Local::now().date_naive());
    info!(
        kind = ?kind,
        file = %file_name,
        bytes = bytes.len(),
        "exported {summary}"
    );

    Ok(ExportedFile {
        kind,
        file_name,
        bytes,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_follows_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            suggested_file_name(ContainerKind::Encrypted, date),
            "trackamole-backup-2024-05-01.tam"
        );
        assert_eq!(
            suggested_file_name(ContainerKind::Plain, date),
            "trackamole-backup-2024-05-01.json"
        );
    }

    #[test]
    fn blank_password_is_no_password() {
        assert!(normalize_password(None).is_none());
        assert!(normalize_password(Some("")).is_none());
        assert!(normalize_password(Some("   \t")).is_none());
        let pw = normalize_password(Some("  correct-horse ")).unwrap();
        assert_eq!(pw.expose_secret().as_str(), "correct-horse");
    }
}
