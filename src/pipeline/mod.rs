//! Run orchestration for proteoflow
//!
//! Ties the stages together: collection in, layout inference, bulk
//! persist, ordered retrieve, integrity verification, collection out.
//!
//! # Design Principles
//!
//! - One run = one table, one layout, one verification report
//! - Store and schema failures abort the run; verification mismatches
//!   are reported outcomes

mod config;
mod runner;

pub use config::PipelineConfig;
pub use runner::{run, run_file_to_file, PipelineError, PipelineResult, RunReport};
