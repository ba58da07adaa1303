//! Credential cipher
//!
//! Fernet encryption of short secrets (broker login, password, session id).
//! Tokens are interchangeable with every other holder of `ENCRYPTION_KEY`:
//! the trading core decrypts what the relay hands out, and values written by
//! earlier deployments keep decrypting.
//!
//! A Fernet token is URL-safe base64 of
//! `0x80 || timestamp || iv || AES-128-CBC ciphertext || HMAC-SHA256`. Every
//! call to [`CredentialCipher::encrypt`] draws a fresh IV, so equal plaintexts
//! never produce equal tokens.

use std::sync::{Arc, RwLock};

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use fernet::Fernet;
use tracing::{debug, warn};

use crate::utils::errors::{CryptoError, CryptoResult};

/// Key length in bytes (signing half plus encryption half)
pub const KEY_LEN: usize = 32;

const VERSION: u8 = 0x80;

/// version + timestamp + iv + one cipher block + hmac
const MIN_TOKEN_LEN: usize = 1 + 8 + 16 + 16 + 32;

/// Shared symmetric cipher for credential fields
///
/// Cloning is cheap and all clones observe [`CredentialCipher::rotate_key`].
#[derive(Clone)]
pub struct CredentialCipher {
    key: Arc<RwLock<String>>,
}

impl CredentialCipher {
    /// Create a cipher from a base64-encoded 32-byte key
    pub fn new(encoded_key: &str) -> CryptoResult<Self> {
        let key = normalize_key(encoded_key)?;
        Ok(Self {
            key: Arc::new(RwLock::new(key)),
        })
    }

    /// Replace the key in place; tokens sealed with the old key stop decrypting
    pub fn rotate_key(&self, encoded_key: &str) -> CryptoResult<()> {
        let key = normalize_key(encoded_key)?;
        let mut guard = self.key.write().unwrap_or_else(|e| e.into_inner());
        *guard = key;
        debug!("Credential cipher key rotated");
        Ok(())
    }

    /// Encrypt a plaintext string into a Fernet token
    pub fn encrypt(&self, plaintext: &str) -> CryptoResult<String> {
        let fernet = self.current().ok_or(CryptoError::EncryptionFailed)?;
        Ok(fernet.encrypt(plaintext.as_bytes()))
    }

    /// Decrypt a Fernet token
    pub fn decrypt(&self, token: &str) -> CryptoResult<String> {
        let result = self.open(token.trim());
        if let Err(e) = &result {
            warn!(error = %e, "Failed to decrypt credential field");
        }
        result
    }

    fn open(&self, token: &str) -> CryptoResult<String> {
        let raw = URL_SAFE
            .decode(token)
            .map_err(|e| CryptoError::MalformedCiphertext(e.to_string()))?;

        if raw.len() < MIN_TOKEN_LEN {
            return Err(CryptoError::MalformedCiphertext(format!(
                "expected at least {} bytes, got {}",
                MIN_TOKEN_LEN,
                raw.len()
            )));
        }
        if raw[0] != VERSION {
            return Err(CryptoError::MalformedCiphertext(format!("unknown token version 0x{:02x}", raw[0])));
        }

        let fernet = self.current().ok_or(CryptoError::DecryptionFailed)?;
        let plaintext = fernet.decrypt(token).map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::MalformedCiphertext("plaintext is not UTF-8".to_string()))
    }

    fn current(&self) -> Option<Fernet> {
        let key = self.key.read().unwrap_or_else(|e| e.into_inner());
        Fernet::new(&key)
    }
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher").finish_non_exhaustive()
    }
}

/// Decode a base64 key in any of the common alphabets and re-encode it in
/// the padded URL-safe form Fernet expects
fn normalize_key(encoded_key: &str) -> CryptoResult<String> {
    let encoded_key = encoded_key.trim();
    if encoded_key.is_empty() {
        return Err(CryptoError::MissingKey);
    }

    let bytes = URL_SAFE
        .decode(encoded_key)
        .or_else(|_| STANDARD.decode(encoded_key))
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded_key))
        .or_else(|_| STANDARD_NO_PAD.decode(encoded_key))
        .map_err(|e| CryptoError::InvalidKey(format!("not valid base64: {}", e)))?;

    if bytes.len() != KEY_LEN {
        return Err(CryptoError::InvalidKey(format!("expected {} bytes, got {}", KEY_LEN, bytes.len())));
    }

    let key = URL_SAFE.encode(bytes);
    Fernet::new(&key).ok_or_else(|| CryptoError::InvalidKey("rejected by Fernet".to_string()))?;
    Ok(key)
}

/// Generate a random key suitable for `ENCRYPTION_KEY`
pub fn generate_key() -> String {
    Fernet::generate_key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Published Fernet test vector
    const VECTOR_KEY: &str = "cw_0x689RpI-jtRR7oE8h_eQsKImvJapLeSbXpwF4e4=";
    const VECTOR_TOKEN: &str = "gAAAAAAdwJ6wAAECAwQFBgcICQoLDA0ODy021cpGVWKZ_eEwCGM4BLLF_5CV9dOPmrhuVUPgJobwOz7JcbmrR64jVmpU4IwqDA==";

    fn cipher() -> CredentialCipher {
        CredentialCipher::new(&generate_key()).unwrap()
    }

    #[test]
    fn test_decrypts_token_from_other_fernet_implementations() {
        let cipher = CredentialCipher::new(VECTOR_KEY).unwrap();
        assert_eq!(cipher.decrypt(VECTOR_TOKEN).unwrap(), "hello");
    }

    #[test]
    fn test_standard_alphabet_key_matches_url_safe_key() {
        let bytes = URL_SAFE.decode(VECTOR_KEY).unwrap();
        let cipher = CredentialCipher::new(&STANDARD.encode(bytes)).unwrap();
        assert_eq!(cipher.decrypt(VECTOR_TOKEN).unwrap(), "hello");
    }

    #[test]
    fn test_tokens_carry_fernet_version() {
        let token = cipher().encrypt("login").unwrap();
        assert!(token.starts_with("gAAAAA"));
        assert_eq!(URL_SAFE.decode(&token).unwrap()[0], VERSION);
    }

    #[test]
    fn test_round_trip_edge_inputs() {
        let cipher = cipher();
        let long_input = "x".repeat(150);
        for plaintext in ["", "login", "пароль с пробелами", "🔐✓", long_input.as_str()] {
            let ciphertext = cipher.encrypt(plaintext).unwrap();
            assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_encryption_is_not_deterministic() {
        let cipher = cipher();
        let first = cipher.encrypt("same input twice").unwrap();
        let second = cipher.encrypt("same input twice").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = cipher().encrypt("secret").unwrap();
        assert_eq!(cipher().decrypt(&ciphertext), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = cipher();
        let ciphertext = cipher.encrypt("do not tamper").unwrap();
        let mut raw = URL_SAFE.decode(&ciphertext).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = URL_SAFE.encode(raw);
        assert_eq!(cipher.decrypt(&tampered), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_malformed_ciphertext_fails() {
        let cipher = cipher();
        assert!(matches!(cipher.decrypt("not base64 at all!"), Err(CryptoError::MalformedCiphertext(_))));
        assert!(matches!(cipher.decrypt("c2hvcnQ="), Err(CryptoError::MalformedCiphertext(_))));

        let mut raw = URL_SAFE.decode(VECTOR_TOKEN).unwrap();
        raw[0] = 0x81;
        assert!(matches!(cipher.decrypt(&URL_SAFE.encode(raw)), Err(CryptoError::MalformedCiphertext(_))));
    }

    #[test]
    fn test_missing_and_short_keys_rejected() {
        assert_eq!(CredentialCipher::new("").unwrap_err(), CryptoError::MissingKey);
        assert!(matches!(CredentialCipher::new("c2hvcnQ="), Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_rotate_key_applies_to_clones() {
        let cipher = cipher();
        let clone = cipher.clone();
        let old_ciphertext = cipher.encrypt("value").unwrap();

        cipher.rotate_key(&generate_key()).unwrap();

        assert!(clone.decrypt(&old_ciphertext).is_err());
        let new_ciphertext = clone.encrypt("value").unwrap();
        assert_eq!(cipher.decrypt(&new_ciphertext).unwrap(), "value");
    }

    proptest! {
        #[test]
        fn prop_round_trip(plaintext in ".{0,200}") {
            let cipher = cipher();
            let ciphertext = cipher.encrypt(&plaintext).unwrap();
            prop_assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
        }
    }
}
