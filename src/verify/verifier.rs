//! Collection equivalence checks
//!
//! Five checks, escalating in strength; a correct round trip passes all
//! of them:
//!
//! 1. count check: record counts match
//! 2. sub-record total check: total sub-record counts match
//! 3. set check: identity-key sets are equal (order-independent)
//! 4. field check: per identity key, every field compares equal and the
//!    sub-record lists match pairwise
//! 5. fingerprint check: the ordered fingerprint sequences are equal at
//!    every position; the only order-sensitive check and the
//!    authoritative round-trip proof
//!
//! Checks return structured outcomes, never print, and never raise: a
//! mismatch means "do not trust the exported collection", not a fault.
//! Each check stops at its first mismatch.

use std::collections::{BTreeSet, HashMap};

use crate::record::{Field, Record};

use super::fingerprint::fingerprint_sequence;

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    /// First offending key or index, with a human-readable reason
    Fail { subject: String, reason: String },
}

impl CheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }

    fn fail(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        CheckOutcome::Fail {
            subject: subject.into(),
            reason: reason.into(),
        }
    }
}

/// Results of all checks over one collection pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub counts: CheckOutcome,
    pub subrecord_totals: CheckOutcome,
    pub identity_sets: CheckOutcome,
    pub fields: CheckOutcome,
    pub fingerprints: CheckOutcome,
}

impl VerificationReport {
    /// The pair is proof-equal iff every check passed.
    pub fn passed(&self) -> bool {
        self.counts.is_pass()
            && self.subrecord_totals.is_pass()
            && self.identity_sets.is_pass()
            && self.fields.is_pass()
            && self.fingerprints.is_pass()
    }

    /// The first failing check, for reporting.
    pub fn first_failure(&self) -> Option<&CheckOutcome> {
        [
            &self.counts,
            &self.subrecord_totals,
            &self.identity_sets,
            &self.fields,
            &self.fingerprints,
        ]
        .into_iter()
        .find(|c| !c.is_pass())
    }
}

/// Structural and cryptographic comparison of two collections.
pub struct IntegrityVerifier {
    identity_fields: Vec<String>,
    subrecord_field: String,
}

impl IntegrityVerifier {
    pub fn new(identity_fields: Vec<String>, subrecord_field: impl Into<String>) -> Self {
        Self {
            identity_fields,
            subrecord_field: subrecord_field.into(),
        }
    }

    /// Runs all checks and collects the outcomes.
    pub fn verify(&self, left: &[Record], right: &[Record]) -> VerificationReport {
        VerificationReport {
            counts: self.count_check(left, right),
            subrecord_totals: self.subrecord_total_check(left, right),
            identity_sets: self.set_check(left, right),
            fields: self.field_check(left, right),
            fingerprints: self.fingerprint_check(left, right),
        }
    }

    /// Record counts must match.
    pub fn count_check(&self, left: &[Record], right: &[Record]) -> CheckOutcome {
        if left.len() == right.len() {
            CheckOutcome::Pass
        } else {
            CheckOutcome::fail(
                "collection",
                format!("record counts differ: {} vs {}", left.len(), right.len()),
            )
        }
    }

    /// Total sub-record counts must match.
    pub fn subrecord_total_check(&self, left: &[Record], right: &[Record]) -> CheckOutcome {
        let total = |records: &[Record]| -> usize {
            records
                .iter()
                .map(|r| r.subrecords(&self.subrecord_field).len())
                .sum()
        };
        let (l, r) = (total(left), total(right));
        if l == r {
            CheckOutcome::Pass
        } else {
            CheckOutcome::fail(
                "collection",
                format!("total sub-record counts differ: {} vs {}", l, r),
            )
        }
    }

    /// Identity-key sets must be equal. Order-independent.
    pub fn set_check(&self, left: &[Record], right: &[Record]) -> CheckOutcome {
        let left_keys = match self.key_set(left) {
            Ok(keys) => keys,
            Err(outcome) => return outcome,
        };
        let right_keys = match self.key_set(right) {
            Ok(keys) => keys,
            Err(outcome) => return outcome,
        };

        if let Some(only_left) = left_keys.difference(&right_keys).next() {
            return CheckOutcome::fail(
                only_left.join(":"),
                "identity key present only in the first collection",
            );
        }
        if let Some(only_right) = right_keys.difference(&left_keys).next() {
            return CheckOutcome::fail(
                only_right.join(":"),
                "identity key present only in the second collection",
            );
        }
        CheckOutcome::Pass
    }

    /// Per identity key present in both collections: every non-sub-record
    /// field equal by value; sub-record lists equal in length with
    /// pairwise-equal identifier and payload at each index.
    pub fn field_check(&self, left: &[Record], right: &[Record]) -> CheckOutcome {
        let right_by_key: HashMap<Vec<String>, &Record> = right
            .iter()
            .filter_map(|r| r.identity_key(&self.identity_fields).map(|k| (k, r)))
            .collect();

        for record in left {
            let Some(key) = record.identity_key(&self.identity_fields) else {
                return CheckOutcome::fail("<unknown>", "record without a usable identity key");
            };
            let Some(other) = right_by_key.get(&key) else {
                // Missing keys belong to the set check
                continue;
            };
            let subject = key.join(":");

            for (name, field) in record.fields() {
                if *name == self.subrecord_field {
                    continue;
                }
                let Field::Value(value) = field else {
                    continue;
                };
                match other.value(name) {
                    Some(other_value) if other_value == value => {}
                    _ => {
                        return CheckOutcome::fail(
                            subject,
                            format!("field '{}' differs between collections", name),
                        )
                    }
                }
            }

            let left_subs = record.subrecords(&self.subrecord_field);
            let right_subs = other.subrecords(&self.subrecord_field);
            if left_subs.len() != right_subs.len() {
                return CheckOutcome::fail(
                    subject,
                    format!(
                        "sub-record counts differ: {} vs {}",
                        left_subs.len(),
                        right_subs.len()
                    ),
                );
            }
            for (i, (l, r)) in left_subs.iter().zip(right_subs.iter()).enumerate() {
                if l.id != r.id {
                    return CheckOutcome::fail(
                        subject,
                        format!("sub-record identifier differs at index {}", i),
                    );
                }
                if l.content != r.content {
                    return CheckOutcome::fail(
                        subject,
                        format!("sub-record payload differs at index {}", i),
                    );
                }
            }
        }
        CheckOutcome::Pass
    }

    /// Ordered fingerprint sequences must match pairwise at every
    /// position. The only check sensitive to record ordering.
    pub fn fingerprint_check(&self, left: &[Record], right: &[Record]) -> CheckOutcome {
        if left.len() != right.len() {
            return CheckOutcome::fail(
                "collection",
                format!("record counts differ: {} vs {}", left.len(), right.len()),
            );
        }
        let left_seq = fingerprint_sequence(left);
        let right_seq = fingerprint_sequence(right);
        for (i, (l, r)) in left_seq.iter().zip(right_seq.iter()).enumerate() {
            if l != r {
                return CheckOutcome::fail(
                    format!("position {}", i),
                    format!("fingerprint mismatch: {} vs {}", l, r),
                );
            }
        }
        CheckOutcome::Pass
    }

    fn key_set(&self, records: &[Record]) -> Result<BTreeSet<Vec<String>>, CheckOutcome> {
        let mut keys = BTreeSet::new();
        for record in records {
            match record.identity_key(&self.identity_fields) {
                Some(key) => {
                    keys.insert(key);
                }
                None => {
                    return Err(CheckOutcome::fail(
                        "<unknown>",
                        "record without a usable identity key",
                    ))
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BinarySubrecord, Value};

    fn make_record(gene: &str, transcript: &str, pdbs: Vec<BinarySubrecord>) -> Record {
        let mut r = Record::new();
        r.push_value("gene_id", Value::Text(gene.into()));
        r.push_value("transcript_id", Value::Text(transcript.into()));
        r.push_value("sequence", Value::Text("MKT".into()));
        r.push_subrecords("pdb_files", pdbs);
        r
    }

    fn verifier() -> IntegrityVerifier {
        IntegrityVerifier::new(
            vec!["gene_id".into(), "transcript_id".into()],
            "pdb_files",
        )
    }

    fn sample_pair() -> (Vec<Record>, Vec<Record>) {
        let records = vec![
            make_record("G1", "T1", vec![BinarySubrecord::new("1ABC", vec![0x00])]),
            make_record("G1", "T2", vec![]),
        ];
        (records.clone(), records)
    }

    #[test]
    fn test_identical_collections_pass_all_checks() {
        let (left, right) = sample_pair();
        let report = verifier().verify(&left, &right);
        assert!(report.passed());
        assert!(report.first_failure().is_none());
    }

    #[test]
    fn test_extra_key_fails_set_check() {
        let (left, mut right) = sample_pair();
        right.push(make_record("G2", "T9", vec![]));

        let report = verifier().verify(&left, &right);
        assert!(!report.passed());
        assert!(!report.identity_sets.is_pass());
        let CheckOutcome::Fail { subject, .. } = &report.identity_sets else {
            panic!("expected failure");
        };
        assert_eq!(subject, "G2:T9");
    }

    #[test]
    fn test_swapped_order_fails_only_fingerprint_check() {
        let (left, mut right) = sample_pair();
        right.swap(0, 1);

        let v = verifier();
        assert!(v.set_check(&left, &right).is_pass());
        assert!(v.field_check(&left, &right).is_pass());

        let outcome = v.fingerprint_check(&left, &right);
        assert!(!outcome.is_pass());
        let CheckOutcome::Fail { subject, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(subject, "position 0");
    }

    #[test]
    fn test_field_difference_reports_key_and_field() {
        let (left, mut right) = sample_pair();
        right[1] = {
            let mut r = Record::new();
            r.push_value("gene_id", Value::Text("G1".into()));
            r.push_value("transcript_id", Value::Text("T2".into()));
            r.push_value("sequence", Value::Text("DIFFERENT".into()));
            r.push_subrecords("pdb_files", vec![]);
            r
        };

        let outcome = verifier().field_check(&left, &right);
        let CheckOutcome::Fail { subject, reason } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(subject, "G1:T2");
        assert!(reason.contains("sequence"));
    }

    #[test]
    fn test_payload_corruption_fails_field_check() {
        let (left, mut right) = sample_pair();
        right[0] = make_record("G1", "T1", vec![BinarySubrecord::new("1ABC", vec![0x01])]);

        let outcome = verifier().field_check(&left, &right);
        let CheckOutcome::Fail { reason, .. } = outcome else {
            panic!("expected failure");
        };
        assert!(reason.contains("payload"));
    }

    #[test]
    fn test_count_mismatch_fails() {
        let (left, mut right) = sample_pair();
        right.pop();
        let report = verifier().verify(&left, &right);
        assert!(!report.counts.is_pass());
        assert!(!report.passed());
    }

    #[test]
    fn test_subrecord_total_mismatch_fails() {
        let (left, mut right) = sample_pair();
        right[1] = make_record("G1", "T2", vec![BinarySubrecord::new("9ZZZ", vec![0x07])]);
        let report = verifier().verify(&left, &right);
        assert!(!report.subrecord_totals.is_pass());
    }
}
