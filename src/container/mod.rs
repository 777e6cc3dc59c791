// src/container/mod.rs
//! Container codec: versioned JSON documents, plaintext or encrypted
//!
//! Both container kinds share a two-field header, `version` and `kind`.
//! [`detect`] reads only that header, so an encrypted backup is recognized
//! (and a too-new one rejected) before any password is asked for or any
//! payload is parsed.
//!
//! Plaintext document:
//!
//! ```json
//! { "version": 1, "kind": "plain", "moles": [...], "entries": [...] }
//! ```
//!
//! The encrypted document is [`EncryptedEnvelope`]; its decrypted payload is
//! exactly a plaintext document.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;

use crate::consts::{FORMAT_VERSION, MIN_SUPPORTED_VERSION};
use crate::crypto::EncryptedEnvelope;
use crate::enums::ContainerKind;
use crate::error::{CoreError, FormatError};
use crate::model::{validate, Dataset, Mole, MoleEntry};

#[derive(Deserialize)]
struct Header {
    #[serde(default)]
    version: Option<u64>,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Serialize)]
struct PlainDocumentRef<'a> {
    version: u32,
    kind: ContainerKind,
    moles: &'a [Mole],
    entries: &'a [MoleEntry],
}

#[derive(Debug, Deserialize)]
struct PlainDocument {
    moles: Vec<Mole>,
    entries: Vec<MoleEntry>,
}

/// Identify the container kind from its header, enforcing the version gate.
pub fn detect(bytes: &[u8]) -> Result<ContainerKind, FormatError> {
    let header: Header =
        serde_json::from_slice(bytes).map_err(|e| FormatError::Corrupt(e.to_string()))?;

    let version = header
        .version
        .ok_or_else(|| FormatError::Corrupt("missing format version".into()))?;
    check_version(version)?;

    match header.kind.as_deref() {
        Some("plain") => Ok(ContainerKind::Plain),
        Some("encrypted") => Ok(ContainerKind::Encrypted),
        Some(other) => Err(FormatError::SchemaMismatch(format!(
            "unknown container kind {other:?}"
        ))),
        None => Err(FormatError::SchemaMismatch("missing container kind".into())),
    }
}

fn check_version(version: u64) -> Result<(), FormatError> {
    if version > u64::from(FORMAT_VERSION) || version < u64::from(MIN_SUPPORTED_VERSION) {
        return Err(FormatError::UnsupportedVersion {
            found: version,
            supported: FORMAT_VERSION,
        });
    }
    Ok(())
}

/// Serialize `dataset` as a compact plaintext document.
///
/// Output depends only on the dataset: field order is fixed by the record
/// types and passthrough fields are kept in sorted order.
pub fn serialize(dataset: &Dataset) -> Result<Vec<u8>, FormatError> {
    serde_json::to_vec(&document_ref(dataset))
        .map_err(|e| FormatError::SchemaMismatch(format!("cannot serialize dataset: {e}")))
}

/// Same document as [`serialize`], indented for human inspection.
pub fn serialize_pretty(dataset: &Dataset) -> Result<Vec<u8>, FormatError> {
    serde_json::to_vec_pretty(&document_ref(dataset))
        .map_err(|e| FormatError::SchemaMismatch(format!("cannot serialize dataset: {e}")))
}

fn document_ref(dataset: &Dataset) -> PlainDocumentRef<'_> {
    PlainDocumentRef {
        version: FORMAT_VERSION,
        kind: ContainerKind::Plain,
        moles: &dataset.moles,
        entries: &dataset.entries,
    }
}

/// Parse and validate a plaintext document.
pub fn deserialize(bytes: &[u8]) -> Result<Dataset, CoreError> {
    let dataset = parse_plain(bytes)?;
    Ok(validate(dataset)?)
}

/// Parse a plaintext document without running dataset validation.
pub fn parse_plain(bytes: &[u8]) -> Result<Dataset, FormatError> {
    match detect(bytes)? {
        ContainerKind::Plain => {}
        ContainerKind::Encrypted => {
            return Err(FormatError::SchemaMismatch(
                "container is encrypted; decrypt it first".into(),
            ))
        }
    }
    let doc: PlainDocument = serde_json::from_slice(bytes).map_err(classify)?;
    Ok(Dataset::new(doc.moles, doc.entries))
}

/// Parse an encrypted document and check its header.
pub fn parse_envelope(bytes: &[u8]) -> Result<EncryptedEnvelope, FormatError> {
    match detect(bytes)? {
        ContainerKind::Encrypted => {}
        ContainerKind::Plain => {
            return Err(FormatError::SchemaMismatch(
                "container is not encrypted".into(),
            ))
        }
    }
    let envelope: EncryptedEnvelope = serde_json::from_slice(bytes).map_err(classify)?;
    envelope.check_header()?;
    Ok(envelope)
}

pub fn encode_envelope(envelope: &EncryptedEnvelope) -> Result<Vec<u8>, FormatError> {
    serde_json::to_vec(envelope)
        .map_err(|e| FormatError::SchemaMismatch(format!("cannot serialize envelope: {e}")))
}

/// Malformed JSON is corruption; well-formed JSON of the wrong shape is a
/// schema mismatch.
fn classify(err: serde_json::Error) -> FormatError {
    match err.classify() {
        Category::Data => FormatError::SchemaMismatch(err.to_string()),
        Category::Syntax | Category::Eof | Category::Io => FormatError::Corrupt(err.to_string()),
    }
}
