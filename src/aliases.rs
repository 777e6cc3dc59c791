// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! These are the canonical secret types used throughout trackamole-backup.

pub use secure_gate::{dynamic_alias, fixed_alias};

// Fixed-size secrets
fixed_alias!(BackupKey32, 32); // 256-bit AES-GCM key derived from the password

// Dynamic secrets
dynamic_alias!(BackupPassword, String); // user-supplied backup password
dynamic_alias!(PlainPayload, Vec<u8>); // decrypted container document
dynamic_alias!(StoreKey, String); // SQLCipher key for the local store
