//! Schema inference error types
//!
//! Error codes:
//! - PF_SCHEMA_EMPTY_SAMPLE (FATAL)
//! - PF_SCHEMA_MISSING_IDENTITY (FATAL)
//! - PF_SCHEMA_IDENTITY_NOT_TEXT (FATAL)
//! - PF_SCHEMA_LAYOUT_VIOLATION (FATAL)
//!
//! All schema errors abort the run: inference failures occur before any
//! storage I/O, and a layout violation means a later record diverged from
//! the layout derived from the first record, which would persist a row
//! that cannot reconstruct its record.

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller may continue with other work
    Error,
    /// The run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Sample record has no fields
    PfSchemaEmptySample,
    /// An identity field is absent from the sample record
    PfSchemaMissingIdentity,
    /// An identity field is present but not text
    PfSchemaIdentityNotText,
    /// A record's field set diverges from the inferred layout
    PfSchemaLayoutViolation,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::PfSchemaEmptySample => "PF_SCHEMA_EMPTY_SAMPLE",
            SchemaErrorCode::PfSchemaMissingIdentity => "PF_SCHEMA_MISSING_IDENTITY",
            SchemaErrorCode::PfSchemaIdentityNotText => "PF_SCHEMA_IDENTITY_NOT_TEXT",
            SchemaErrorCode::PfSchemaLayoutViolation => "PF_SCHEMA_LAYOUT_VIOLATION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with field context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    field: Option<String>,
}

impl SchemaError {
    /// Create an empty-sample error
    pub fn empty_sample() -> Self {
        Self {
            code: SchemaErrorCode::PfSchemaEmptySample,
            message: "Sample record has no fields; cannot derive a layout".into(),
            field: None,
        }
    }

    /// Create a missing-identity error
    pub fn missing_identity(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::PfSchemaMissingIdentity,
            message: format!("Identity field '{}' is absent from the sample record", field),
            field: Some(field),
        }
    }

    /// Create an identity-not-text error
    pub fn identity_not_text(field: impl Into<String>, actual: &'static str) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::PfSchemaIdentityNotText,
            message: format!("Identity field '{}' must be text, got {}", field, actual),
            field: Some(field),
        }
    }

    /// Create a layout-violation error
    pub fn layout_violation(detail: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::PfSchemaLayoutViolation,
            message: detail.into(),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field name involved, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns whether this error must abort the run
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::PfSchemaEmptySample.code(), "PF_SCHEMA_EMPTY_SAMPLE");
        assert_eq!(
            SchemaErrorCode::PfSchemaMissingIdentity.code(),
            "PF_SCHEMA_MISSING_IDENTITY"
        );
        assert_eq!(
            SchemaErrorCode::PfSchemaLayoutViolation.code(),
            "PF_SCHEMA_LAYOUT_VIOLATION"
        );
    }

    #[test]
    fn test_all_schema_errors_fatal() {
        assert!(SchemaError::empty_sample().is_fatal());
        assert!(SchemaError::missing_identity("gene_id").is_fatal());
        assert!(SchemaError::layout_violation("extra field 'x'").is_fatal());
    }

    #[test]
    fn test_display_contains_code_and_field() {
        let err = SchemaError::missing_identity("transcript_id");
        let display = format!("{}", err);
        assert!(display.contains("PF_SCHEMA_MISSING_IDENTITY"));
        assert!(display.contains("transcript_id"));
        assert!(display.contains("FATAL"));
    }
}
