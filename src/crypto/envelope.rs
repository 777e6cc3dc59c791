// src/crypto/envelope.rs
//! The encrypted container document
//!
//! Everything needed to re-derive the key and open the ciphertext is stored
//! here except the password itself.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CIPHER_ALGORITHM, FORMAT_VERSION, KDF_ALGORITHM, MIN_SUPPORTED_VERSION, NONCE_LEN, SALT_LEN,
    TAG_LEN,
};
use crate::crypto::kdf::KdfParams;
use crate::enums::ContainerKind;
use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    pub version: u32,
    pub kind: ContainerKind,
    pub kdf: KdfSpec,
    pub cipher: String,
    /// base64, 12 bytes
    pub nonce: String,
    /// base64, ciphertext followed by the 16-byte GCM tag
    pub ciphertext: String,
}

/// KDF identifier, salt and work factor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfSpec {
    pub algorithm: String,
    /// base64, 16 bytes
    pub salt: String,
    pub iterations: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl KdfSpec {
    pub(crate) fn argon2id(salt: &[u8], params: &KdfParams) -> Self {
        Self {
            algorithm: KDF_ALGORITHM.to_owned(),
            salt: STANDARD.encode(salt),
            iterations: params.iterations,
            memory_kib: params.memory_kib,
            parallelism: params.parallelism,
        }
    }

    pub fn params(&self) -> KdfParams {
        KdfParams::new(self.memory_kib, self.iterations, self.parallelism)
    }
}

/// Decoded binary fields of an envelope
pub(crate) struct OpenedFields {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    /// Bytes authenticated alongside the ciphertext. Editing the version,
    /// KDF parameters or cipher name breaks the tag.
    pub(crate) fn associated_data(&self) -> Vec<u8> {
        format!(
            "trackamole-backup/v{}/{}/m={},t={},p={}/{}",
            self.version,
            self.kdf.algorithm,
            self.kdf.memory_kib,
            self.kdf.iterations,
            self.kdf.parallelism,
            self.cipher
        )
        .into_bytes()
    }

    /// Header checks that need no password.
    pub fn check_header(&self) -> Result<(), FormatError> {
        if self.version > FORMAT_VERSION || self.version < MIN_SUPPORTED_VERSION {
            return Err(FormatError::UnsupportedVersion {
                found: u64::from(self.version),
                supported: FORMAT_VERSION,
            });
        }
        if self.kind != ContainerKind::Encrypted {
            return Err(FormatError::SchemaMismatch(
                "envelope kind must be \"encrypted\"".into(),
            ));
        }
        if self.kdf.algorithm != KDF_ALGORITHM {
            return Err(FormatError::SchemaMismatch(format!(
                "unknown KDF {:?}",
                self.kdf.algorithm
            )));
        }
        if self.cipher != CIPHER_ALGORITHM {
            return Err(FormatError::SchemaMismatch(format!(
                "unknown cipher {:?}",
                self.cipher
            )));
        }
        self.kdf
            .params()
            .check_bounds()
            .map_err(FormatError::SchemaMismatch)
    }

    pub(crate) fn open_fields(&self) -> Result<OpenedFields, FormatError> {
        let salt = decode_fixed::<SALT_LEN>(&self.kdf.salt, "salt")?;
        let nonce = decode_fixed::<NONCE_LEN>(&self.nonce, "nonce")?;
        let ciphertext = STANDARD
            .decode(&self.ciphertext)
            .map_err(|e| FormatError::Corrupt(format!("ciphertext is not base64: {e}")))?;
        if ciphertext.len() < TAG_LEN {
            return Err(FormatError::Corrupt(
                "ciphertext shorter than the authentication tag".into(),
            ));
        }
        Ok(OpenedFields {
            salt,
            nonce,
            ciphertext,
        })
    }
}

fn decode_fixed<const N: usize>(b64: &str, what: &str) -> Result<[u8; N], FormatError> {
    let bytes = STANDARD
        .decode(b64)
        .map_err(|e| FormatError::Corrupt(format!("{what} is not base64: {e}")))?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        FormatError::Corrupt(format!("{what} must be {N} bytes, got {}", bytes.len()))
    })
}
