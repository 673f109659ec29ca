use crate::range::CandidateId;
use crate::record::CatalogRecord;

/// Classification of one candidate id by the record validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Both lookups returned usable fields.
    Valid {
        id: CandidateId,
        name: String,
        price: u64,
    },
    /// The id does not denote a priced product.
    Invalid { id: CandidateId },
    /// A lookup could not be completed (transport or parse fault).
    Errored { id: CandidateId, message: String },
}

impl ValidationOutcome {
    pub fn id(&self) -> CandidateId {
        match self {
            Self::Valid { id, .. } | Self::Invalid { id } | Self::Errored { id, .. } => *id,
        }
    }

    /// The catalog record for a `Valid` outcome.
    pub fn to_record(&self) -> Option<CatalogRecord> {
        match self {
            Self::Valid { id, name, price } => CatalogRecord::new(*id, name.clone(), *price),
            _ => None,
        }
    }
}

/// Counters accumulated over one validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub valid_count: u64,
    pub invalid_count: u64,
    pub error_count: u64,
    pub total_processed: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ValidationOutcome) {
        match outcome {
            ValidationOutcome::Valid { .. } => self.valid_count += 1,
            ValidationOutcome::Invalid { .. } => self.invalid_count += 1,
            ValidationOutcome::Errored { .. } => self.error_count += 1,
        }
        self.total_processed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_kind() {
        let mut summary = RunSummary::default();
        summary.record(&ValidationOutcome::Valid {
            id: 1,
            name: "Apple".into(),
            price: 1000,
        });
        summary.record(&ValidationOutcome::Invalid { id: 2 });
        summary.record(&ValidationOutcome::Errored {
            id: 3,
            message: "timeout".into(),
        });
        assert_eq!(
            summary,
            RunSummary {
                valid_count: 1,
                invalid_count: 1,
                error_count: 1,
                total_processed: 3,
            }
        );
    }

    #[test]
    fn only_valid_outcomes_produce_records() {
        let valid = ValidationOutcome::Valid {
            id: 9,
            name: "Milk".into(),
            price: 2500,
        };
        assert_eq!(valid.to_record().unwrap().price, 2500);
        assert!(ValidationOutcome::Invalid { id: 9 }.to_record().is_none());
    }
}
