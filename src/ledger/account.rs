//! Account balance and nonce lookup.
//!
//! Nothing is cached here: callers about to mutate state fetch a fresh nonce
//! so a stale in-memory value from an earlier failed call is never reused.

use serde_json::Value;

use crate::ledger::gateway::LedgerGateway;
use crate::ledger::types::{Balance, LedgerError, LedgerResult};

/// Fetch balance and last-used nonce for `address`.
pub async fn fetch_balance<G: LedgerGateway>(gateway: &G, address: &str) -> LedgerResult<Balance> {
    let response = gateway
        .get(&["balance", address])
        .await?
        .error_for_status()?;

    let body = &response.body;
    let nonce = body.get("nonce").and_then(Value::as_u64).ok_or_else(|| {
        LedgerError::MalformedResponse(format!("missing or invalid nonce in {}", body))
    })?;

    // Some gateways report balance as a number.
    let balance = match body.get("balance") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(LedgerError::MalformedResponse(format!(
                "missing or invalid balance in {}",
                body
            )))
        }
    };

    tracing::debug!(address = %address, balance = %balance, nonce, "Fetched account state");

    Ok(Balance { balance, nonce })
}
