//! Confirmation polling under an attempt budget.
//!
//! # State Transitions
//! ```text
//! Pending → Confirmed: status query reports "confirmed"
//! Pending → TimedOut:  max_attempts queries made without confirmation
//! ```
//!
//! Transport errors and non-success responses count as non-confirming
//! attempts; they never end the wait early.

use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::ledger::gateway::LedgerGateway;
use crate::ledger::types::{TxReceipt, TxStatus};
use crate::observability::metrics;

/// Default wait between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Polling budget. There is no default attempt count; call sites choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPolicy {
    /// Policy with the default 5 second interval.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Upper bound on time spent sleeping between attempts.
    pub fn window(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

/// Polls a transaction until confirmed or the budget runs out.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPoller {
    policy: PollPolicy,
}

impl ConfirmationPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    /// Wait for `tx_hash` to reach a terminal status.
    pub async fn wait<G: LedgerGateway>(&self, gateway: &G, tx_hash: &str) -> TxReceipt {
        let mut receipt = TxReceipt::pending(tx_hash);

        tracing::info!(
            tx_hash = %tx_hash,
            max_attempts = self.policy.max_attempts,
            interval_ms = self.policy.interval.as_millis() as u64,
            window_secs = self.policy.window().as_secs(),
            "Waiting for confirmation"
        );

        for attempt in 1..=self.policy.max_attempts {
            let status = match gateway.get(&["tx", tx_hash]).await {
                Ok(response) if response.is_success() => response
                    .body
                    .get("status")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                Ok(response) => {
                    tracing::warn!(
                        tx_hash = %tx_hash,
                        attempt,
                        status = response.status,
                        "Status query returned non-success response"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, attempt, error = %e, "Status query failed");
                    None
                }
            };

            if status.as_deref() == Some("confirmed") {
                metrics::record_poll_attempt("confirmed");
                receipt.status = TxStatus::Confirmed;
                break;
            }

            metrics::record_poll_attempt(if status.is_some() { "pending" } else { "error" });
            tracing::debug!(
                tx_hash = %tx_hash,
                attempt,
                status = status.as_deref().unwrap_or("unknown"),
                "Transaction not yet confirmed"
            );

            if attempt < self.policy.max_attempts {
                sleep(self.policy.interval).await;
            }
        }

        if !receipt.status.is_terminal() {
            receipt.status = TxStatus::TimedOut;
            tracing::warn!(
                tx_hash = %tx_hash,
                attempts = self.policy.max_attempts,
                "Confirmation budget exhausted"
            );
        } else {
            tracing::info!(tx_hash = %tx_hash, "Transaction confirmed");
        }

        metrics::record_confirmation(receipt.status);
        receipt
    }
}
