//! Ledger transaction client library.
//!
//! Builds, signs, and submits contract transactions to a remote ledger
//! service and polls them to confirmation.

pub mod config;
pub mod ledger;
pub mod observability;

pub use config::ClientConfig;
pub use ledger::{ConfirmationPoller, ContractClient, HttpGateway, LedgerError, PollPolicy};
