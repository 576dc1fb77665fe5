//! proteoflow - A lossless, order-preserving relational round-trip
//! pipeline for protein collections
//!
//! Persists dynamically-shaped protein records (with embedded binary
//! structure files) into a relational table and proves the stored form
//! reproduces the input byte-for-byte and in order.

pub mod collection;
pub mod encoding;
pub mod export;
pub mod mapper;
pub mod observability;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod store;
pub mod transfer;
pub mod verify;
