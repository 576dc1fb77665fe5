//! Pipeline run configuration

use crate::schema::InferencePolicy;

/// Everything one run needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Destination table name
    pub table: String,
    /// Field-name policy driving layout inference
    pub policy: InferencePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            table: "protein_table".into(),
            policy: InferencePolicy::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_protein_table() {
        let config = PipelineConfig::default();
        assert_eq!(config.table, "protein_table");
        assert_eq!(config.policy.subrecord_field, "pdb_files");
    }

    #[test]
    fn test_with_table_overrides_destination() {
        let config = PipelineConfig::default().with_table("proteins_v2");
        assert_eq!(config.table, "proteins_v2");
    }
}
