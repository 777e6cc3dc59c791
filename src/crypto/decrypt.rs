// src/crypto/decrypt.rs
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::aliases::{BackupPassword, PlainPayload};
use crate::crypto::envelope::EncryptedEnvelope;
use crate::crypto::kdf::derive_key;
use crate::error::{CoreError, CryptoError};

/// Re-derive the key and open the envelope.
///
/// A tag mismatch is always [`CryptoError::AuthenticationFailed`]; nothing
/// from an unauthenticated ciphertext is ever returned.
pub fn decrypt(
    envelope: &EncryptedEnvelope,
    password: &BackupPassword,
) -> Result<PlainPayload, CoreError> {
    if password.expose_secret().is_empty() {
        return Err(CryptoError::MissingPassword.into());
    }
    envelope.check_header()?;
    let fields = envelope.open_fields()?;

    let key = derive_key(password, &fields.salt, &envelope.kdf.params())?;
    let cipher =
        Aes256Gcm::new_from_slice(key.expose_secret()).map_err(|_| CryptoError::Encryption)?;

    let aad = envelope.associated_data();
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&fields.nonce),
            Payload {
                msg: &fields.ciphertext,
                aad: &aad,
            },
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(PlainPayload::new(plaintext))
}
