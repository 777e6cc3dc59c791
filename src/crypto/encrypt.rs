// src/crypto/encrypt.rs
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::aliases::BackupPassword;
use crate::consts::{CIPHER_ALGORITHM, FORMAT_VERSION, NONCE_LEN, SALT_LEN};
use crate::crypto::envelope::{EncryptedEnvelope, KdfSpec};
use crate::crypto::kdf::{derive_key, KdfParams};
use crate::enums::ContainerKind;
use crate::error::CryptoError;

/// Encrypt a serialized plaintext container under `password`.
///
/// Salt and nonce are drawn fresh from the OS-seeded RNG on every call and
/// cannot be supplied by the caller, so two exports never share either.
pub fn encrypt(
    plaintext: &[u8],
    password: &BackupPassword,
    params: &KdfParams,
) -> Result<EncryptedEnvelope, CryptoError> {
    if password.expose_secret().is_empty() {
        return Err(CryptoError::MissingPassword);
    }
    params.check_bounds().map_err(CryptoError::Kdf)?;

    let salt: [u8; SALT_LEN] = rand::random();
    let nonce: [u8; NONCE_LEN] = rand::random();

    let mut envelope = EncryptedEnvelope {
        version: FORMAT_VERSION,
        kind: ContainerKind::Encrypted,
        kdf: KdfSpec::argon2id(&salt, params),
        cipher: CIPHER_ALGORITHM.to_owned(),
        nonce: STANDARD.encode(nonce),
        ciphertext: String::new(),
    };

    let key = derive_key(password, &salt, params)?;
    let cipher =
        Aes256Gcm::new_from_slice(key.expose_secret()).map_err(|_| CryptoError::Encryption)?;

    let aad = envelope.associated_data();
    let sealed = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|_| CryptoError::Encryption)?;

    envelope.ciphertext = STANDARD.encode(sealed);
    Ok(envelope)
}
