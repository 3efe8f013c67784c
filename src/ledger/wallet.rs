//! Account key material.
//!
//! # Security
//! - Private keys come from a key file or environment variables only
//! - Keys are never logged or serialized
//! - `Debug` output for key types is redacted
//! - Key bytes are wiped on drop

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ed25519_dalek::{SigningKey, SECRET_KEY_LENGTH};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::ledger::types::{LedgerError, LedgerResult};

/// Environment variable holding the base64 private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "LEDGER_PRIVATE_KEY";
/// Environment variable holding the account address.
pub const ADDRESS_ENV_VAR: &str = "LEDGER_ADDRESS";
/// Environment variable holding the gateway base URL.
pub const RPC_URL_ENV_VAR: &str = "LEDGER_RPC_URL";

/// Raw Ed25519 secret key bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; SECRET_KEY_LENGTH]);

impl PrivateKey {
    /// Accept raw bytes; fails unless exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> LedgerResult<Self> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(LedgerError::InvalidKey(format!(
                "expected {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            )));
        }
        let mut key = Self([0u8; SECRET_KEY_LENGTH]);
        key.0.copy_from_slice(bytes);
        Ok(key)
    }

    /// Decode a base64 private key.
    pub fn from_base64(encoded: &str) -> LedgerResult<Self> {
        let bytes = Zeroizing::new(
            BASE64
                .decode(encoded.trim())
                .map_err(|e| LedgerError::InvalidKey(format!("Invalid base64: {}", e)))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        use rand::RngCore;

        let mut key = Self([0u8; SECRET_KEY_LENGTH]);
        rand::rngs::OsRng.fill_bytes(&mut key.0);
        key
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Base64 export, used only by key generation.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A single signing account.
pub struct Account {
    address: String,
    key: PrivateKey,
}

impl Account {
    pub fn new(address: impl Into<String>, key: PrivateKey) -> Self {
        Self {
            address: address.into(),
            key,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.key
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Key material as supplied by a wallet file.
///
/// The encoded key is wiped when the material is dropped.
#[derive(Deserialize)]
pub struct KeyMaterial {
    /// Base64-encoded private key.
    pub private_key: String,
    pub address: String,
    /// Gateway base URL associated with this wallet.
    #[serde(default)]
    pub rpc_url: Option<String>,
}

impl KeyMaterial {
    /// Load key material from a JSON wallet file.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::InvalidKey(format!("Cannot read key file {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| LedgerError::InvalidKey(format!("Invalid key file: {}", e)))
    }

    /// Load key material from `LEDGER_PRIVATE_KEY` / `LEDGER_ADDRESS` / `LEDGER_RPC_URL`.
    pub fn from_env() -> LedgerResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            LedgerError::InvalidKey(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;
        let address = std::env::var(ADDRESS_ENV_VAR).map_err(|_| {
            LedgerError::InvalidKey(format!("Environment variable {} not set", ADDRESS_ENV_VAR))
        })?;

        Ok(Self {
            private_key,
            address,
            rpc_url: std::env::var(RPC_URL_ENV_VAR).ok(),
        })
    }

    /// Decode into a usable account.
    pub fn into_account(self) -> LedgerResult<Account> {
        let key = PrivateKey::from_base64(&self.private_key)?;
        tracing::info!(address = %self.address, "Account loaded");
        Ok(Account::new(self.address.clone(), key))
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("address", &self.address)
            .field("rpc_url", &self.rpc_url)
            .finish_non_exhaustive()
    }
}
