//! Relational store collaborator interface for proteoflow
//!
//! The database engine itself (connections, DDL/DML execution,
//! transactions) lives outside this crate. The pipeline is written
//! against the `RelationalStore` trait; the in-memory backend here is
//! the reference implementation and the one the test suites use.
//!
//! # Design Principles
//!
//! - Narrow seam: create-if-absent, insert with skip-on-conflict,
//!   ordered select, identity-predicate select
//! - Retrieval order comes from the position column, never from
//!   storage-internal row order
//! - Duplicate identity keys are skipped, never overwritten

mod backend;
mod errors;
mod memory;

pub use backend::{InsertOutcome, RelationalStore};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
