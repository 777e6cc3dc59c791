// src/crypto/kdf.rs
//! Argon2id key derivation
//!
//! Argon2id is memory-hard, so every password guess against a stolen
//! backup costs the attacker the configured memory and time. The salt is
//! random per export; the work factor travels with the envelope.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::aliases::{BackupKey32, BackupPassword};
use crate::consts::{
    DEFAULT_KDF_ITERATIONS, DEFAULT_KDF_MEMORY_KIB, DEFAULT_KDF_PARALLELISM, KEY_LEN,
    MAX_KDF_ITERATIONS, MAX_KDF_MEMORY_KIB, MAX_KDF_PARALLELISM,
};
use crate::error::CryptoError;

/// Argon2id work factor. Fields missing from a config file keep their
/// defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_KDF_MEMORY_KIB,
            iterations: DEFAULT_KDF_ITERATIONS,
            parallelism: DEFAULT_KDF_PARALLELISM,
        }
    }
}

impl KdfParams {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Reject work factors Argon2 cannot run or that are unreasonably large
    /// for a file that may come from anywhere.
    pub fn check_bounds(&self) -> Result<(), String> {
        if !(1..=MAX_KDF_PARALLELISM).contains(&self.parallelism) {
            return Err(format!(
                "parallelism {} outside 1..={MAX_KDF_PARALLELISM}",
                self.parallelism
            ));
        }
        if !(1..=MAX_KDF_ITERATIONS).contains(&self.iterations) {
            return Err(format!(
                "iterations {} outside 1..={MAX_KDF_ITERATIONS}",
                self.iterations
            ));
        }
        let min_memory = 8 * self.parallelism;
        if !(min_memory..=MAX_KDF_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(format!(
                "memory {} KiB outside {min_memory}..={MAX_KDF_MEMORY_KIB}",
                self.memory_kib
            ));
        }
        Ok(())
    }
}

/// Derive the 256-bit backup key from `password` and `salt`.
pub fn derive_key(
    password: &BackupPassword,
    salt: &[u8],
    params: &KdfParams,
) -> Result<BackupKey32, CryptoError> {
    let argon_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CryptoError::Kdf(format!("invalid Argon2 parameters: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut raw = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.expose_secret().as_bytes(), salt, &mut raw)
        .map_err(|e| CryptoError::Kdf(e.to_string()))?;

    let key = BackupKey32::new(raw);
    raw.zeroize();
    Ok(key)
}
