//! End-to-end run orchestration
//!
//! One run: infer the layout from the first record, apply it to the
//! store, persist every record in order, retrieve the full table back,
//! and verify the retrieved collection against the input. The report
//! carries the verification outcome; a failed verification is a result
//! to act on, not a raised fault.

use std::path::Path;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::collection::{read_collection, write_collection, CollectionError};
use crate::observability::{Logger, Severity};
use crate::record::Record;
use crate::schema::{Layout, SchemaError, TypeInferencer};
use crate::store::{RelationalStore, StoreError};
use crate::transfer::{BulkTransferEngine, TransferError};
use crate::verify::{IntegrityVerifier, VerificationReport};

use super::config::PipelineConfig;

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a run before verification can happen.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input collection contains no records")]
    EmptyInput,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collection(#[from] CollectionError),
}

/// Summary of one completed run.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    /// Records attempted (input size), not rows actually inserted
    pub records_attempted: usize,
    /// Records read back from the store
    pub records_retrieved: usize,
    /// The layout the run operated under
    pub layout: Layout,
    /// Outcome of the round-trip checks
    pub verification: VerificationReport,
}

impl RunReport {
    pub fn verified(&self) -> bool {
        self.verification.passed()
    }
}

/// Runs the full persist/retrieve/verify cycle over in-memory records.
pub fn run<S: RelationalStore>(
    config: &PipelineConfig,
    store: &mut S,
    records: &[Record],
) -> PipelineResult<RunReport> {
    let run_id = Uuid::new_v4();
    let started = Utc::now();
    Logger::log(
        Severity::Info,
        "run_started",
        &[
            ("records", &records.len().to_string()),
            ("run_id", &run_id.to_string()),
            ("table", &config.table),
        ],
    );

    let sample = records.first().ok_or(PipelineError::EmptyInput)?;
    let key_order = sample.key_order();

    let layout = TypeInferencer::new(config.policy.clone()).infer(sample)?;
    store.create_table_if_absent(&config.table, &layout)?;

    let mut engine = BulkTransferEngine::new(store, &config.table);
    let records_attempted = engine.persist_all(records, &layout)?;
    let retrieved = engine.retrieve_all(&layout, &key_order)?;

    let verifier = IntegrityVerifier::new(
        layout.identity_fields.clone(),
        layout.subrecord_field.clone(),
    );
    let verification = verifier.verify(records, &retrieved);

    let finished = Utc::now();
    let report = RunReport {
        run_id,
        started,
        finished,
        records_attempted,
        records_retrieved: retrieved.len(),
        layout,
        verification,
    };

    if report.verified() {
        Logger::log(
            Severity::Info,
            "run_complete",
            &[
                ("retrieved", &report.records_retrieved.to_string()),
                ("run_id", &run_id.to_string()),
                ("verified", "true"),
            ],
        );
    } else {
        let detail = report
            .verification
            .first_failure()
            .map(|f| format!("{:?}", f))
            .unwrap_or_default();
        Logger::log_stderr(
            Severity::Error,
            "run_verification_failed",
            &[("detail", &detail), ("run_id", &run_id.to_string())],
        );
    }
    Ok(report)
}

/// Runs the cycle from a collection file, writing the retrieved records
/// to an output collection file.
pub fn run_file_to_file<S: RelationalStore>(
    config: &PipelineConfig,
    store: &mut S,
    input: &Path,
    output: &Path,
) -> PipelineResult<RunReport> {
    let records = read_collection(input)?;
    let report = run(config, store, &records)?;

    let key_order = records.first().map(|r| r.key_order()).unwrap_or_default();
    let engine = BulkTransferEngine::new(store, &config.table);
    let retrieved = engine.retrieve_all(&report.layout, &key_order)?;
    write_collection(output, &retrieved, &report.layout.subrecord_field)?;

    Ok(report)
}
