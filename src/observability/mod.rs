//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ledger subsystem produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stderr log output
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
