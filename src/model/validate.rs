// src/model/validate.rs
//! Structural validation of a dataset: pure, no I/O

use std::collections::HashSet;

use crate::consts::MAX_SEVERITY;
use crate::error::ValidationError;
use crate::model::{Dataset, Mole, MoleEntry};

/// Validate `dataset` and hand it back unchanged on success.
///
/// Stops at the first problem found; moles are checked before entries so a
/// broken mole is reported before the entries that point at it.
pub fn validate(dataset: Dataset) -> Result<Dataset, ValidationError> {
    check(&dataset)?;
    Ok(dataset)
}

impl Dataset {
    /// Borrowing variant of [`validate`].
    pub fn check(&self) -> Result<(), ValidationError> {
        check(self)
    }
}

fn check(dataset: &Dataset) -> Result<(), ValidationError> {
    let mut mole_ids = HashSet::with_capacity(dataset.moles.len());
    for mole in &dataset.moles {
        if !mole_ids.insert(mole.id) {
            return Err(ValidationError::DuplicateMoleId(mole.id));
        }
        check_mole(mole)?;
    }

    let mut entry_ids = HashSet::with_capacity(dataset.entries.len());
    for entry in &dataset.entries {
        if !entry_ids.insert(entry.id) {
            return Err(ValidationError::DuplicateEntryId(entry.id));
        }
        if !mole_ids.contains(&entry.mole_id) {
            return Err(ValidationError::DanglingMoleRef {
                entry_id: entry.id,
                mole_id: entry.mole_id,
            });
        }
        check_entry(entry)?;
    }

    Ok(())
}

fn check_mole(mole: &Mole) -> Result<(), ValidationError> {
    const RECORD: &str = "mole";

    if mole.label.is_empty() {
        return Err(ValidationError::EmptyLabel(mole.id));
    }
    finite_vec(RECORD, mole.id, "position", &mole.position)?;
    if let Some(normal) = &mole.normal {
        finite_vec(RECORD, mole.id, "normal", normal)?;
    }
    if mole.created_at < 0 {
        return Err(out_of_range(RECORD, mole.id, "createdAt"));
    }
    if let Some(spread) = mole.spread {
        positive(RECORD, mole.id, "spread", spread)?;
    }
    Ok(())
}

fn check_entry(entry: &MoleEntry) -> Result<(), ValidationError> {
    const RECORD: &str = "entry";

    if entry.date < 0 {
        return Err(out_of_range(RECORD, entry.id, "date"));
    }
    finite(RECORD, entry.id, "size", entry.size)?;
    if entry.size < 0.0 {
        return Err(out_of_range(RECORD, entry.id, "size"));
    }
    if entry.severity.is_some_and(|s| s > MAX_SEVERITY) {
        return Err(out_of_range(RECORD, entry.id, "severity"));
    }
    if let Some(scale) = entry.scale_reference {
        positive(RECORD, entry.id, "scaleReference", scale)?;
    }

    if let Some(flags) = &entry.abcde {
        let mut seen = HashSet::with_capacity(flags.len());
        for flag in flags {
            if !seen.insert(*flag) {
                return Err(ValidationError::RepeatedAbcdeFlag {
                    entry_id: entry.id,
                    flag: flag.letter(),
                });
            }
        }
    }

    if let Some(photo) = &entry.photo {
        if photo.is_blob_url() {
            return Err(ValidationError::BlobPhoto { entry_id: entry.id });
        }
        let invalid = |reason: String| ValidationError::InvalidPhoto {
            entry_id: entry.id,
            reason,
        };
        match photo.mime_type() {
            Some(mime) if mime.starts_with("image/") => {}
            Some(mime) => return Err(invalid(format!("unexpected MIME type {mime:?}"))),
            None => return Err(invalid("not a base64 data URL".into())),
        }
        photo.decode().map_err(|e| invalid(e.to_string()))?;
    }

    Ok(())
}

fn finite(
    record: &'static str,
    id: i64,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { record, id, field })
    }
}

fn finite_vec(
    record: &'static str,
    id: i64,
    field: &'static str,
    values: &[f64; 3],
) -> Result<(), ValidationError> {
    values
        .iter()
        .try_for_each(|v| finite(record, id, field, *v))
}

fn positive(
    record: &'static str,
    id: i64,
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    finite(record, id, field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(record, id, field))
    }
}

fn out_of_range(record: &'static str, id: i64, field: &'static str) -> ValidationError {
    ValidationError::OutOfRange { record, id, field }
}
