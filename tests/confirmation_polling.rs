//! Confirmation poller behaviour under scripted status sequences.

use ledger_client::ledger::{
    ConfirmationPoller, GatewayResponse, LedgerError, PollPolicy, TxStatus,
};
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod common;
use common::ScriptedGateway;

fn fast_policy(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(max_attempts).with_interval(Duration::from_millis(1))
}

/// Gateway reporting "pending" for `confirm_on - 1` polls, then "confirmed".
fn confirms_on(confirm_on: u32) -> ScriptedGateway {
    let calls = Arc::new(AtomicU32::new(0));
    ScriptedGateway::new(move |_| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        let status = if n >= confirm_on { "confirmed" } else { "pending" };
        Ok(GatewayResponse::ok(json!({ "status": status })))
    })
}

#[tokio::test]
async fn test_confirms_after_exactly_n_polls() {
    let gateway = confirms_on(4);
    let receipt = ConfirmationPoller::new(fast_policy(10))
        .wait(&gateway, "tx1")
        .await;

    assert_eq!(receipt.status, TxStatus::Confirmed);
    assert_eq!(receipt.hash, "tx1");
    assert_eq!(gateway.count("/tx/tx1"), 4);
}

#[tokio::test]
async fn test_confirms_on_last_allowed_attempt() {
    let gateway = confirms_on(3);
    let receipt = ConfirmationPoller::new(fast_policy(3))
        .wait(&gateway, "tx1")
        .await;

    assert_eq!(receipt.status, TxStatus::Confirmed);
    assert_eq!(gateway.count("/tx/"), 3);
}

#[tokio::test]
async fn test_times_out_without_exceeding_budget() {
    let gateway = confirms_on(6);
    let receipt = ConfirmationPoller::new(fast_policy(5))
        .wait(&gateway, "tx2")
        .await;

    assert_eq!(receipt.status, TxStatus::TimedOut);
    assert_eq!(gateway.count("/tx/"), 5);
}

#[tokio::test]
async fn test_zero_budget_never_polls() {
    let gateway = confirms_on(1);
    let receipt = ConfirmationPoller::new(fast_policy(0))
        .wait(&gateway, "tx3")
        .await;

    assert_eq!(receipt.status, TxStatus::TimedOut);
    assert_eq!(gateway.count("/tx/"), 0);
}

#[tokio::test]
async fn test_transient_errors_count_against_budget() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let gateway = ScriptedGateway::new(move |_| {
        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
        match n {
            1 => Err(LedgerError::RemoteUnavailable("connection reset".into())),
            2 => Ok(GatewayResponse::new(503, json!("Service Unavailable"))),
            _ => Ok(GatewayResponse::ok(json!({"status": "confirmed"}))),
        }
    });

    let receipt = ConfirmationPoller::new(fast_policy(5))
        .wait(&gateway, "tx4")
        .await;
    assert_eq!(receipt.status, TxStatus::Confirmed);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_persistent_errors_end_as_timed_out() {
    let gateway = ScriptedGateway::new(|_| Err(LedgerError::RemoteUnavailable("down".into())));
    let receipt = ConfirmationPoller::new(fast_policy(4))
        .wait(&gateway, "tx5")
        .await;

    assert_eq!(receipt.status, TxStatus::TimedOut);
    assert_eq!(gateway.count("/tx/"), 4);
}

#[tokio::test]
async fn test_unknown_status_keeps_polling() {
    let gateway = ScriptedGateway::new(|_| Ok(GatewayResponse::ok(json!({"status": "failed"}))));
    let receipt = ConfirmationPoller::new(fast_policy(3))
        .wait(&gateway, "tx6")
        .await;

    assert_eq!(receipt.status, TxStatus::TimedOut);
    assert_eq!(gateway.count("/tx/"), 3);
}

#[tokio::test]
async fn test_waits_interval_between_attempts() {
    let gateway = confirms_on(3);
    let policy = PollPolicy::new(3).with_interval(Duration::from_millis(50));

    let started = Instant::now();
    let receipt = ConfirmationPoller::new(policy).wait(&gateway, "tx7").await;

    assert_eq!(receipt.status, TxStatus::Confirmed);
    // Two sleeps between three attempts, none after the last.
    assert!(started.elapsed() >= Duration::from_millis(100));
}
