//! Canonical transaction encoding and Ed25519 signing.
//!
//! The signed message is the compact JSON encoding of the six transaction
//! fields in declaration order: `from, to, amount, nonce, ou, timestamp`.
//! Any verifier must rebuild exactly these bytes.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use ed25519_dalek::{Signature, Signer as _, Verifier as _, VerifyingKey};

use crate::ledger::types::{LedgerError, LedgerResult, SignedTransaction, Transaction};
use crate::ledger::wallet::PrivateKey;

/// Canonical byte encoding of a transaction.
pub fn canonical_bytes(tx: &Transaction) -> LedgerResult<Vec<u8>> {
    serde_json::to_vec(tx).map_err(|e| LedgerError::Encoding(e.to_string()))
}

/// Sign a transaction, returning the base64 signature.
pub fn sign(private_key: &[u8], tx: &Transaction) -> LedgerResult<String> {
    let key = PrivateKey::from_bytes(private_key)?;
    let message = canonical_bytes(tx)?;
    let signature = key.signing_key().sign(&message);
    Ok(BASE64.encode(signature.to_bytes()))
}

/// Derive the base64 public key for a private key.
pub fn public_key(private_key: &[u8]) -> LedgerResult<String> {
    let key = PrivateKey::from_bytes(private_key)?;
    Ok(BASE64.encode(key.signing_key().verifying_key().to_bytes()))
}

/// Sign and bundle a transaction with its signature and public key.
pub fn sign_transaction(private_key: &[u8], tx: Transaction) -> LedgerResult<SignedTransaction> {
    let signature = sign(private_key, &tx)?;
    let public_key = public_key(private_key)?;
    Ok(SignedTransaction::new(tx, signature, public_key))
}

/// Check a base64 signature against a transaction and base64 public key.
///
/// Malformed keys or signatures verify as `false`.
pub fn verify(public_key_b64: &str, tx: &Transaction, signature_b64: &str) -> bool {
    let Ok(key_bytes) = BASE64.decode(public_key_b64) else {
        return false;
    };
    let Ok(key_array) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
        return false;
    };
    let Ok(verifying_key) = VerifyingKey::from_bytes(&key_array) else {
        return false;
    };
    let Ok(sig_bytes) = BASE64.decode(signature_b64) else {
        return false;
    };
    let Ok(sig_array) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
        return false;
    };
    let Ok(message) = canonical_bytes(tx) else {
        return false;
    };

    verifying_key
        .verify(&message, &Signature::from_bytes(&sig_array))
        .is_ok()
}
