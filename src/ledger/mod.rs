//! Transaction lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! KeyMaterial (key file / environment)
//!     → wallet.rs (decode key, Account)
//!     → account.rs (fetch balance + nonce)
//!     → contract.rs (build tx with nonce + 1)
//!     → signer.rs (canonical encoding, Ed25519 signature)
//!     → gateway.rs (submit)
//!     → poller.rs (poll until confirmed or budget exhausted)
//! ```
//!
//! # Security Constraints
//! - Private keys never logged or serialized
//! - Signing errors abort before any network call
//! - Rejected submissions are never retried automatically

pub mod account;
pub mod contract;
pub mod gateway;
pub mod interface;
pub mod poller;
pub mod signer;
pub mod types;
pub mod wallet;

pub use contract::ContractClient;
pub use gateway::{GatewayResponse, HttpGateway, LedgerGateway};
pub use interface::ContractInterface;
pub use poller::{ConfirmationPoller, PollPolicy};
pub use types::{
    Balance, CallKind, CallOutcome, ContractCallSpec, LedgerError, LedgerResult,
    SignedTransaction, Transaction, TxReceipt, TxStatus,
};
pub use wallet::{Account, KeyMaterial, PrivateKey};
