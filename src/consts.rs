// src/consts.rs
//! Shared constants: format identifiers and security parameters

/// Container format version written by this crate
pub const FORMAT_VERSION: u32 = 1;

/// Oldest container version this crate can read
pub const MIN_SUPPORTED_VERSION: u32 = 1;

/// File extension for password-protected backups
pub const ENCRYPTED_EXTENSION: &str = "tam";

/// File extension for plaintext backups
pub const PLAIN_EXTENSION: &str = "json";

/// Prefix of suggested export file names
pub const EXPORT_FILE_STEM: &str = "trackamole-backup";

/// KDF identifier stored in the envelope
pub const KDF_ALGORITHM: &str = "argon2id";

/// Cipher identifier stored in the envelope
pub const CIPHER_ALGORITHM: &str = "aes-256-gcm";

/// Argon2id defaults (OWASP minimum for Argon2id)
pub const DEFAULT_KDF_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_KDF_ITERATIONS: u32 = 2;
pub const DEFAULT_KDF_PARALLELISM: u32 = 1;

/// Upper bounds accepted from an untrusted envelope
pub const MAX_KDF_MEMORY_KIB: u32 = 1024 * 1024;
pub const MAX_KDF_ITERATIONS: u32 = 64;
pub const MAX_KDF_PARALLELISM: u32 = 16;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const KEY_LEN: usize = 32;
pub const TAG_LEN: usize = 16;

/// Severity scores run from 0 to this value inclusive
pub const MAX_SEVERITY: u8 = 10;

/// Spread used for multi-lesion rendering when a mole has none
pub const DEFAULT_SPREAD: f64 = 2.0;
