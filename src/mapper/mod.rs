//! Record mapping subsystem for proteoflow
//!
//! Turns one logical record into one storage row honoring the inferred
//! layout, and back. The explicit sequence position rides on every row;
//! the sub-record list is split into two parallel same-length arrays and
//! re-zipped on read.
//!
//! # Invariants Enforced
//!
//! - Sub-record order is preserved index-for-index in both directions
//! - Parallel arrays always have equal length; divergence is fatal
//! - Field-set divergence from the layout is fatal, never coerced

mod errors;
mod mapper;
mod row;

pub use errors::{MapperError, MapperResult};
pub use mapper::RecordMapper;
pub use row::Row;
