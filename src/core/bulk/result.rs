//! Aggregated result of a bulk operation

use super::executor::UnitOutcome;

/// One successful item of a bulk call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkSuccess {
    /// Position of the item in the input
    pub index: usize,

    /// Affected record ID; `None` if a create response carried none
    pub id: Option<String>,
}

/// One failed item of a bulk call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure {
    /// Position of the item in the input
    pub index: usize,

    /// Best-effort record ID
    pub id: Option<String>,

    /// Error message
    pub error: String,
}

/// Outcome of a bulk call
///
/// `succeeded` and `failures` partition the input by index. Both lists are
/// in completion order; every entry carries its input position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkResult {
    pub succeeded: Vec<BulkSuccess>,
    pub failures: Vec<BulkFailure>,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_count: usize,
}

impl BulkResult {
    /// The all-zero result for empty input
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a result from executor outcomes
    pub fn from_outcomes(outcomes: Vec<UnitOutcome>) -> Self {
        let mut result = Self::empty();
        for outcome in outcomes {
            match outcome.result {
                Ok(id) => result.succeeded.push(BulkSuccess {
                    index: outcome.index,
                    id,
                }),
                Err(failure) => result.failures.push(BulkFailure {
                    index: outcome.index,
                    id: failure.id,
                    error: failure.message,
                }),
            }
        }
        result.success_count = result.succeeded.len();
        result.failure_count = result.failures.len();
        result.total_count = result.success_count + result.failure_count;
        result
    }

    /// True when every item succeeded
    pub fn is_complete_success(&self) -> bool {
        self.failure_count == 0
    }

    /// Record IDs of successful items, in completion order
    pub fn succeeded_ids(&self) -> Vec<&str> {
        self.succeeded.iter().filter_map(|s| s.id.as_deref()).collect()
    }

    /// Input positions of successful items, ascending
    pub fn succeeded_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.succeeded.iter().map(|s| s.index).collect();
        indices.sort_unstable();
        indices
    }

    /// Input positions of failed items, ascending
    pub fn failed_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.failures.iter().map(|f| f.index).collect();
        indices.sort_unstable();
        indices
    }

    /// ID produced by the item at `index`, if it succeeded with one
    pub fn id_for(&self, index: usize) -> Option<&str> {
        self.succeeded
            .iter()
            .find(|success| success.index == index)
            .and_then(|success| success.id.as_deref())
    }
}
