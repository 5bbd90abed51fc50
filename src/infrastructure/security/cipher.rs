use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::domain::error::SecurityError;
use crate::domain::models::TokenData;

const NONCE_LEN: usize = 12;

/// AES-256-GCM cipher for token data at rest.
///
/// Ciphertexts are `base64(nonce || ciphertext || tag)`; a fresh random
/// nonce is drawn for every encryption.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Derive the key as SHA-256 of `secret`
    pub fn from_secret(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    /// Random key that lives only as long as this process
    pub fn random() -> Self {
        let mut key = [0_u8; 32];
        OsRng.fill_bytes(&mut key);
        Self {
            cipher: Aes256Gcm::new(&key.into()),
        }
    }

    /// Use `secret` when configured, otherwise a random per-process key
    pub fn from_optional_secret(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(secret) => Self::from_secret(secret),
            None => {
                tracing::warn!(
                    "ENCRYPTION_KEY not set; using a random key, stored tokens will not survive a restart"
                );
                Self::random()
            }
        }
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecurityError> {
        let mut nonce = [0_u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| SecurityError::Encryption)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(combined))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String, SecurityError> {
        let combined = STANDARD
            .decode(encoded)
            .map_err(|e| SecurityError::Encoding(format!("Invalid base64: {e}")))?;

        if combined.len() <= NONCE_LEN {
            return Err(SecurityError::Encoding("ciphertext too short".to_string()));
        }
        let (nonce, ciphertext) = combined.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| SecurityError::Decryption)?;

        String::from_utf8(plaintext).map_err(|e| SecurityError::Encoding(e.to_string()))
    }

    pub fn encrypt_token(&self, token: &TokenData) -> Result<String, SecurityError> {
        self.encrypt(&serde_json::to_string(token)?)
    }

    pub fn decrypt_token(&self, encoded: &str) -> Result<TokenData, SecurityError> {
        Ok(serde_json::from_str(&self.decrypt(encoded)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_encrypt_decrypt() {
        let cipher = TokenCipher::from_secret("correct horse battery staple");
        let encrypted = cipher.encrypt("pk_1_SECRET").unwrap();

        assert!(!encrypted.contains("pk_1_SECRET"));
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "pk_1_SECRET");
    }

    #[test]
    fn test_nonce_differs_per_encryption() {
        let cipher = TokenCipher::random();
        assert_ne!(cipher.encrypt("same").unwrap(), cipher.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = TokenCipher::from_secret("one").encrypt("data").unwrap();
        let result = TokenCipher::from_secret("two").decrypt(&encrypted);
        assert!(matches!(result, Err(SecurityError::Decryption)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = TokenCipher::from_secret("key");
        let encrypted = cipher.encrypt("data").unwrap();
        let mut bytes = STANDARD.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let result = cipher.decrypt(&STANDARD.encode(bytes));
        assert!(matches!(result, Err(SecurityError::Decryption)));
    }

    #[test]
    fn test_garbage_input() {
        let cipher = TokenCipher::from_secret("key");
        assert!(matches!(cipher.decrypt("%%%"), Err(SecurityError::Encoding(_))));
        assert!(matches!(cipher.decrypt("AAAA"), Err(SecurityError::Encoding(_))));
    }

    #[test]
    fn test_token_data_roundtrip() {
        let cipher = TokenCipher::from_secret("key");
        let token = TokenData::issued_now(
            "access".to_string(),
            "refresh".to_string(),
            Duration::days(7),
            Some("team-1".to_string()),
        );

        let encrypted = cipher.encrypt_token(&token).unwrap();
        assert_eq!(cipher.decrypt_token(&encrypted).unwrap(), token);
    }
}
