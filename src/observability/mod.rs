//! Observability for proteoflow
//!
//! Structured, synchronous JSON logging. One line per event, explicit
//! severity, deterministic key order.

mod logger;

pub use logger::{Logger, Severity};
