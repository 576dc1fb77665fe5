//! Dynamic schema inference for proteoflow
//!
//! No column layout is declared in advance: the layout is inferred once
//! per run from the first record of the input collection and treated as
//! immutable for the whole run.
//!
//! # Design Principles
//!
//! - One-shot inference from a representative sample
//! - Layout as a tagged-variant enumeration, not runtime dispatch
//! - Identity fields drive the store's uniqueness constraint
//! - Divergence from the layout after inference is fatal, never coerced

mod errors;
mod inferencer;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use inferencer::{InferencePolicy, TypeInferencer};
pub use types::{ColumnDef, Layout, ScalarShape, StorageType, BOUNDED_TEXT_WIDTH};
