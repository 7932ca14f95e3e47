//! # Authenticated Symmetric Encryption
//!
//! NaCl secretbox (XSalsa20-Poly1305): a 24-byte random nonce per message,
//! authenticated ciphertext. Decryption fails closed on a wrong key or
//! tampered ciphertext rather than returning garbage.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use xsalsa20poly1305::{
    aead::{Aead, KeyInit},
    Key, XSalsa20Poly1305, XNonce,
};

use super::entities::{EncryptedPayload, ENC_TAG};
use super::errors::SessionError;

/// Encrypts `plaintext` under `key`, producing the wire-format payload.
/// `ephemeral_pub_key` is attached when the handshake that produced this key
/// used a fresh, one-shot key pair.
pub fn encrypt(
    key: &[u8; 32],
    plaintext: &[u8],
    ephemeral_pub_key: Option<String>,
) -> Result<EncryptedPayload, SessionError> {
    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));

    let mut nonce_bytes = [0u8; 24];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = XNonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| SessionError::EncryptionFailed(e.to_string()))?;

    Ok(EncryptedPayload {
        enc: ENC_TAG.to_string(),
        ciphertext: STANDARD.encode(ciphertext),
        nonce: STANDARD.encode(nonce_bytes),
        ephemeral_pub_key,
    })
}

/// Decrypts an [`EncryptedPayload`] under `key`. Fails rather than returning
/// garbage on a wrong key or tampered ciphertext.
pub fn decrypt(key: &[u8; 32], payload: &EncryptedPayload) -> Result<Vec<u8>, SessionError> {
    let nonce_bytes = STANDARD
        .decode(&payload.nonce)
        .map_err(|e| SessionError::InvalidEncoding(e.to_string()))?;
    if nonce_bytes.len() != 24 {
        return Err(SessionError::InvalidNonceLength { expected: 24, actual: nonce_bytes.len() });
    }
    let ciphertext = STANDARD
        .decode(&payload.ciphertext)
        .map_err(|e| SessionError::InvalidEncoding(e.to_string()))?;

    let cipher = XSalsa20Poly1305::new(Key::from_slice(key));
    let nonce = XNonce::from_slice(&nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext.as_slice())
        .map_err(|e| SessionError::DecryptionFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> [u8; 32] {
        [seed; 32]
    }

    #[test]
    fn round_trips() {
        let k = key(1);
        let payload = encrypt(&k, b"hello session", None).unwrap();
        let plaintext = decrypt(&k, &payload).unwrap();
        assert_eq!(plaintext, b"hello session");
    }

    #[test]
    fn wrong_key_fails_closed() {
        let payload = encrypt(&key(1), b"secret", None).unwrap();
        assert!(decrypt(&key(2), &payload).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails_closed() {
        let mut payload = encrypt(&key(1), b"secret", None).unwrap();
        let mut bytes = STANDARD.decode(&payload.ciphertext).unwrap();
        bytes[0] ^= 0xFF;
        payload.ciphertext = STANDARD.encode(bytes);
        assert!(decrypt(&key(1), &payload).is_err());
    }

    #[test]
    fn nonces_are_unique_across_calls() {
        let k = key(3);
        let a = encrypt(&k, b"same plaintext", None).unwrap();
        let b = encrypt(&k, b"same plaintext", None).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }
}
