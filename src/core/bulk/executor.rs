//! Bounded concurrent executor
//!
//! Runs N independent units of work with at most `max_concurrency` in flight.
//! Each call builds its own gate, so concurrent bulk calls never share a
//! concurrency budget. Every spawned unit is awaited before `run` returns.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Concurrency ceiling for bulk operations
pub const MAX_CONCURRENCY: usize = 10;

/// Failure of one unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    /// Best-effort record ID
    pub id: Option<String>,

    /// Error text, passed through unmodified
    pub message: String,
}

impl UnitFailure {
    pub fn new(id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            message: message.into(),
        }
    }
}

/// Result of one unit: the affected record ID, if the backend returned one,
/// or a failure
pub type UnitResult = Result<Option<String>, UnitFailure>;

/// A unit of work; it does nothing until polled
pub type Unit = BoxFuture<'static, UnitResult>;

/// Outcome of one unit, tagged with its input position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOutcome {
    pub index: usize,
    pub result: UnitResult,
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("unit of work panicked: {text}")
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("unit of work panicked: {text}")
    } else {
        "unit of work panicked".to_string()
    }
}

/// Adds a failed outcome for every index in `0..total` that has none
fn fill_missing(mut outcomes: Vec<UnitOutcome>, total: usize) -> Vec<UnitOutcome> {
    if outcomes.len() == total {
        return outcomes;
    }

    let mut seen = vec![false; total];
    for outcome in &outcomes {
        if let Some(slot) = seen.get_mut(outcome.index) {
            *slot = true;
        }
    }
    for (index, _) in seen.iter().enumerate().filter(|(_, seen)| !**seen) {
        outcomes.push(UnitOutcome {
            index,
            result: Err(UnitFailure::new(None, "unit of work did not complete")),
        });
    }
    outcomes
}

/// Executor with a fixed concurrency ceiling
#[derive(Debug, Clone, Copy)]
pub struct BoundedExecutor {
    max_concurrency: usize,
}

impl Default for BoundedExecutor {
    fn default() -> Self {
        Self::new(MAX_CONCURRENCY)
    }
}

impl BoundedExecutor {
    /// Creates an executor; a ceiling of 0 is raised to 1
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Runs every unit and returns one outcome per input index
    ///
    /// Outcomes come back in completion order. A unit that panics yields a
    /// failed outcome for its own index; its gate slot is released during
    /// unwinding, so siblings keep running.
    pub async fn run(&self, units: Vec<Unit>) -> Vec<UnitOutcome> {
        if units.is_empty() {
            return Vec::new();
        }

        let total = units.len();
        let gate = Arc::new(Semaphore::new(self.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, unit) in units.into_iter().enumerate() {
            let gate = Arc::clone(&gate);
            tasks.spawn(async move {
                // Held until this block returns or unwinds
                let _permit = match gate.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return UnitOutcome {
                            index,
                            result: Err(UnitFailure::new(None, format!("concurrency gate closed: {e}"))),
                        }
                    }
                };

                let result = AssertUnwindSafe(unit)
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| Err(UnitFailure::new(None, panic_message(payload))));

                UnitOutcome { index, result }
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!(error = %e, "Bulk task did not complete");
                }
            }
        }

        tracing::debug!(
            total = total,
            completed = outcomes.len(),
            max_concurrency = self.max_concurrency,
            "Executor drained"
        );

        fill_missing(outcomes, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let outcomes = BoundedExecutor::default().run(Vec::new()).await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_every_index_reported_once() {
        let units: Vec<Unit> = (0..25)
            .map(|i| async move { Ok::<_, UnitFailure>(Some(format!("id{i}"))) }.boxed())
            .collect();

        let outcomes = BoundedExecutor::default().run(units).await;
        let mut indices: Vec<usize> = outcomes.iter().map(|o| o.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..25).collect::<Vec<_>>());

        for outcome in &outcomes {
            assert_eq!(outcome.result, Ok(Some(format!("id{}", outcome.index))));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_never_exceeds_ceiling() {
        let live = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let units: Vec<Unit> = (0..60)
            .map(|i| {
                let live = Arc::clone(&live);
                let peak = Arc::clone(&peak);
                async move {
                    let now = live.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    live.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, UnitFailure>(Some(i.to_string()))
                }
                .boxed()
            })
            .collect();

        let outcomes = BoundedExecutor::default().run(units).await;
        assert_eq!(outcomes.len(), 60);
        assert!(peak.load(Ordering::SeqCst) <= MAX_CONCURRENCY);
        assert!(peak.load(Ordering::SeqCst) > 1);
    }

    async fn explode() -> UnitResult {
        panic!("boom")
    }

    #[tokio::test]
    async fn test_panicking_unit_does_not_leak_gate() {
        let executor = BoundedExecutor::new(1);
        let units: Vec<Unit> = vec![
            explode().boxed(),
            async { Ok::<_, UnitFailure>(Some("after".to_string())) }.boxed(),
            async { Err::<Option<String>, _>(UnitFailure::new(Some("x".to_string()), "remote failed")) }.boxed(),
        ];

        let mut outcomes = executor.run(units).await;
        outcomes.sort_by_key(|o| o.index);

        assert_eq!(outcomes.len(), 3);
        let failure = outcomes[0].result.clone().unwrap_err();
        assert!(failure.message.contains("boom"));
        assert_eq!(outcomes[1].result, Ok(Some("after".to_string())));
        assert_eq!(outcomes[2].result.clone().unwrap_err().message, "remote failed");
    }

    #[test]
    fn test_lost_outcomes_become_failures() {
        let outcomes = vec![
            UnitOutcome {
                index: 2,
                result: Ok(Some("c".to_string())),
            },
            UnitOutcome {
                index: 0,
                result: Ok(None),
            },
        ];

        let mut filled = fill_missing(outcomes, 4);
        filled.sort_by_key(|o| o.index);

        assert_eq!(filled.iter().map(|o| o.index).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(filled[1].result.as_ref().unwrap_err().message.contains("did not complete"));
        assert!(filled[3].result.is_err());
        assert_eq!(filled[2].result, Ok(Some("c".to_string())));
    }

    #[test]
    fn test_complete_outcomes_untouched() {
        let outcomes = vec![UnitOutcome {
            index: 0,
            result: Ok(Some("a".to_string())),
        }];
        assert_eq!(fill_missing(outcomes.clone(), 1), outcomes);
    }

    #[test]
    fn test_zero_ceiling_raised() {
        assert_eq!(BoundedExecutor::new(0).max_concurrency(), 1);
    }
}
