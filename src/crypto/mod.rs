// src/crypto/mod.rs
//! Password-based authenticated encryption: no I/O, no database
//!
//! Argon2id turns the password into a 256-bit key; AES-256-GCM seals the
//! serialized container. All functions work on in-memory buffers.

mod decrypt;
mod encrypt;
mod envelope;
mod kdf;

pub use decrypt::decrypt;
pub use encrypt::encrypt;
pub use envelope::{EncryptedEnvelope, KdfSpec};
pub use kdf::{derive_key, KdfParams};
