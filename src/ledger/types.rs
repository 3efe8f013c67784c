//! Ledger data types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Private key material is malformed (bad base64 or wrong length).
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The gateway could not be reached (connect failure, timeout).
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The gateway answered with a non-success response.
    #[error("Remote error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// The gateway refused a submitted transaction.
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// A transaction could not be encoded for signing.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A response was missing a field or had an unexpected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Contract interface descriptor could not be read or parsed.
    #[error("Invalid contract interface: {0}")]
    InvalidInterface(String),

    /// The account nonce cannot be advanced without wrapping.
    #[error("Nonce {0} cannot be incremented")]
    NonceExhausted(u64),

    /// Method is not declared by the contract interface.
    #[error("Unknown contract method: {0}")]
    UnknownMethod(String),

    /// Parameter count does not match the declared method signature.
    #[error("Method '{method}' expects {expected} parameters, got {actual}")]
    ParamCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    /// A parameter exceeds its declared maximum length.
    #[error("Parameter '{param}' of '{method}' exceeds max length {max_length}")]
    ParamTooLong {
        method: String,
        param: String,
        max_length: usize,
    },
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Account balance and last-used nonce as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub balance: String,
    pub nonce: u64,
}

/// Nonce the next transaction must carry after `current`; never wraps.
pub fn next_nonce_after(current: u64) -> LedgerResult<u64> {
    current
        .checked_add(1)
        .ok_or(LedgerError::NonceExhausted(current))
}

/// Unsigned transaction.
///
/// Field declaration order is the canonical signing order; do not reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: String,
    pub nonce: u64,
    /// Operation units charged for remote execution.
    #[serde(rename = "ou")]
    pub operation_units: String,
    /// Unix seconds, fixed when the transaction is built.
    pub timestamp: f64,
}

impl Transaction {
    /// Build a transaction stamped with the current time.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: impl Into<String>,
        nonce: u64,
        operation_units: impl Into<String>,
    ) -> Self {
        Self::with_timestamp(from, to, amount, nonce, operation_units, unix_now())
    }

    /// Build a transaction with an explicit timestamp.
    pub fn with_timestamp(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: impl Into<String>,
        nonce: u64,
        operation_units: impl Into<String>,
        timestamp: f64,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount: amount.into(),
            nonce,
            operation_units: operation_units.into(),
            timestamp,
        }
    }
}

/// A transaction together with its signature and the signer's public key.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    transaction: Transaction,
    signature: String,
    public_key: String,
}

impl SignedTransaction {
    pub(crate) fn new(transaction: Transaction, signature: String, public_key: String) -> Self {
        Self {
            transaction,
            signature,
            public_key,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Base64-encoded Ed25519 signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Base64-encoded public key.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

/// Whether a contract method reads or mutates state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    View,
    #[serde(alias = "call")]
    Mutating,
}

/// A validated contract invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCallSpec {
    pub contract_address: String,
    pub method: String,
    pub params: Vec<String>,
    pub kind: CallKind,
}

/// Outcome of dispatching a [`ContractCallSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Result of a view call, absent when the remote produced no textual result.
    View(Option<String>),
    /// Hash of a submitted mutating call.
    Submitted(String),
}

/// Transaction confirmation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Submitted, no terminal status observed yet.
    Pending,
    /// Finalized by the remote ledger.
    Confirmed,
    /// Attempt budget exhausted; outcome unknown.
    TimedOut,
}

impl TxStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, TxStatus::Pending)
    }

    fn as_str(self) -> &'static str {
        match self {
            TxStatus::Pending => "pending",
            TxStatus::Confirmed => "confirmed",
            TxStatus::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt for a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub hash: String,
    pub status: TxStatus,
}

impl TxReceipt {
    pub fn pending(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            status: TxStatus::Pending,
        }
    }
}

/// Current unix time in fractional seconds.
pub fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
