use std::time::Duration;

use crate::http::FailureCause;

/// Totals gathered by the result consumer. Only the consumer task mutates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub completed: u64,
    pub total_bytes: u64,
    pub errors: u64,
    pub limit_reached: bool,
}

impl RunStatistics {
    pub(crate) const fn record_success(&mut self, bytes: u64) {
        self.completed = self.completed.saturating_add(1);
        self.total_bytes = self.total_bytes.saturating_add(bytes);
    }

    pub(crate) const fn record_failure(&mut self) {
        self.errors = self.errors.saturating_add(1);
    }
}

/// Rolling de-duplication of failure log lines.
///
/// A failure is worth logging only when its cause differs from the failure
/// immediately before it, so a burst of identical errors prints once.
#[derive(Debug, Default)]
pub(crate) struct FailureLog {
    previous: Option<FailureCause>,
}

impl FailureLog {
    pub(crate) fn should_log(&mut self, cause: &FailureCause) -> bool {
        if self.previous.as_ref() == Some(cause) {
            return false;
        }
        self.previous = Some(cause.clone());
        true
    }
}

/// Final figures handed to the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: u64,
    pub total_bytes: u64,
    pub errors: u64,
    pub duration: Duration,
}

impl RunSummary {
    #[must_use]
    pub const fn new(statistics: &RunStatistics, duration: Duration) -> Self {
        Self {
            completed: statistics.completed,
            total_bytes: statistics.total_bytes,
            errors: statistics.errors,
            duration,
        }
    }

    /// Wall-clock time divided by completed requests; zero when none completed.
    #[must_use]
    pub fn average(&self) -> Duration {
        let nanos = self
            .duration
            .as_nanos()
            .checked_div(u128::from(self.completed))
            .unwrap_or(0);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
