//! Round-trip integrity verification for proteoflow
//!
//! Proves byte-for-byte and order-exact equivalence between the
//! pre-store and post-store collections: structurally (key sets, field
//! values, sub-record lists) and cryptographically (ordered SHA-256
//! fingerprint sequences).
//!
//! # Design Principles
//!
//! - Checks return structured outcomes; presentation is the caller's job
//! - A verification failure is a reported result, never a raised fault
//! - Only the fingerprint check is order-sensitive; it is the
//!   authoritative proof

mod fingerprint;
mod verifier;

pub use fingerprint::{fingerprint, fingerprint_sequence, Fingerprint};
pub use verifier::{CheckOutcome, IntegrityVerifier, VerificationReport};
