//! In-memory data model for proteoflow
//!
//! # Design Principles
//!
//! - Records are ordered field maps; field order is significant
//! - One designated field per record holds the binary sub-record list
//! - Records are immutable once read from input
//! - Values form a closed sum type with an explicit binary variant

mod record;
mod value;

pub use record::{BinarySubrecord, Field, Record};
pub use value::Value;
