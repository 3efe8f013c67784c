//! Contract view calls and signed mutating calls.
//!
//! # Data Flow
//! ```text
//! submit_call:
//!     → account::fetch_balance (fresh nonce)
//!     → call_mutating (build tx with nonce + 1, sign)
//!     → POST /call-contract
//!     → tx hash
//! ```
//!
//! Rejections are surfaced with the remote's reason and never retried:
//! resubmitting the same nonce would be rejected again.

use serde_json::{json, Value};

use crate::ledger::account;
use crate::ledger::gateway::{GatewayResponse, LedgerGateway};
use crate::ledger::signer;
use crate::ledger::types::{
    next_nonce_after, Balance, CallKind, CallOutcome, ContractCallSpec, LedgerError,
    LedgerResult, Transaction,
};
use crate::ledger::wallet::Account;
use crate::observability::metrics;

/// Contract calls carry no value transfer.
pub const CONTRACT_CALL_AMOUNT: &str = "0";

/// Operation-unit cost marker attached to every contract call.
pub const CONTRACT_CALL_OU: &str = "1";

/// Client for invoking contract methods through a gateway.
#[derive(Debug, Clone)]
pub struct ContractClient<G> {
    gateway: G,
}

impl<G: LedgerGateway> ContractClient<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Fetch balance and nonce for `address`.
    pub async fn fetch_balance(&self, address: &str) -> LedgerResult<Balance> {
        account::fetch_balance(&self.gateway, address).await
    }

    /// Run a read-only contract method.
    ///
    /// Returns `None` unless the remote reports `"success"` with a textual
    /// result. Only transport failures are errors.
    pub async fn call_view(
        &self,
        contract: &str,
        method: &str,
        params: &[String],
        caller: &str,
    ) -> LedgerResult<Option<String>> {
        let payload = json!({
            "contract": contract,
            "method": method,
            "params": params,
            "caller": caller,
        });

        let response = self.gateway.post(&["contract", "call-view"], &payload).await?;

        if !response.is_success() || response.status_field() != Some("success") {
            tracing::debug!(
                contract = %contract,
                method = %method,
                status = response.status,
                "View call produced no result"
            );
            return Ok(None);
        }

        Ok(response
            .body
            .get("result")
            .and_then(Value::as_str)
            .map(str::to_owned))
    }

    /// Sign and submit a mutating call using `current_nonce + 1`.
    ///
    /// `current_nonce` must be the last-used nonce freshly fetched from the
    /// gateway. Returns the transaction hash.
    pub async fn call_mutating(
        &self,
        account: &Account,
        current_nonce: u64,
        contract: &str,
        method: &str,
        params: &[String],
    ) -> LedgerResult<String> {
        let nonce = next_nonce_after(current_nonce)?;
        let tx = Transaction::new(
            account.address(),
            contract,
            CONTRACT_CALL_AMOUNT,
            nonce,
            CONTRACT_CALL_OU,
        );
        let signed = signer::sign_transaction(account.private_key().as_bytes(), tx)?;
        let tx = signed.transaction();

        let payload = json!({
            "contract": contract,
            "method": method,
            "params": params,
            "caller": account.address(),
            "nonce": tx.nonce,
            "timestamp": tx.timestamp,
            "signature": signed.signature(),
            "publicKey": signed.public_key(),
        });

        tracing::info!(
            caller = %account.address(),
            contract = %contract,
            method = %method,
            nonce = tx.nonce,
            "Submitting contract call"
        );

        let response = self.gateway.post(&["call-contract"], &payload).await?;

        match accepted_hash(&response) {
            Ok(hash) => {
                metrics::record_submission("accepted");
                tracing::info!(tx_hash = %hash, nonce = tx.nonce, "Contract call accepted");
                Ok(hash)
            }
            Err(e) => {
                metrics::record_submission("rejected");
                tracing::warn!(error = %e, nonce = tx.nonce, "Contract call rejected");
                Err(e)
            }
        }
    }

    /// Fetch a fresh nonce, then sign and submit a mutating call.
    pub async fn submit_call(
        &self,
        account: &Account,
        contract: &str,
        method: &str,
        params: &[String],
    ) -> LedgerResult<String> {
        let state = self.fetch_balance(account.address()).await?;
        self.call_mutating(account, state.nonce, contract, method, params)
            .await
    }

    /// Dispatch a validated call spec by kind.
    pub async fn invoke(
        &self,
        account: &Account,
        spec: &ContractCallSpec,
    ) -> LedgerResult<CallOutcome> {
        match spec.kind {
            CallKind::View => self
                .call_view(
                    &spec.contract_address,
                    &spec.method,
                    &spec.params,
                    account.address(),
                )
                .await
                .map(CallOutcome::View),
            CallKind::Mutating => self
                .submit_call(account, &spec.contract_address, &spec.method, &spec.params)
                .await
                .map(CallOutcome::Submitted),
        }
    }
}

/// Extract the transaction hash from a submission response.
fn accepted_hash(response: &GatewayResponse) -> LedgerResult<String> {
    let rejected = !response.is_success()
        || matches!(response.status_field(), Some(s) if s != "success" && s != "pending");

    if !rejected {
        if let Some(hash) = response.body.get("tx_hash").and_then(Value::as_str) {
            return Ok(hash.to_string());
        }
        if rejection_reason(&response.body).is_none() {
            return Err(LedgerError::MalformedResponse(format!(
                "missing tx_hash in {}",
                response.body_text()
            )));
        }
    }

    let reason = rejection_reason(&response.body).unwrap_or_else(|| response.body_text());
    Err(LedgerError::SubmissionRejected(reason))
}

fn rejection_reason(body: &Value) -> Option<String> {
    ["error", "message", "reason"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}
