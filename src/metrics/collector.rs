use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

use crate::args::ErrorLimit;
use crate::http::{Outcome, ResultRecord};
use crate::shutdown::{ShutdownSender, trigger_shutdown};

use super::types::{FailureLog, RunStatistics};

/// Spawns the task that drains the result stream into [`RunStatistics`].
///
/// The task returns when the stream closes, or immediately after it fires
/// shutdown because `error_limit` was reached. Records still queued at that
/// point are dropped unread.
#[must_use]
pub fn setup_result_consumer(
    results_rx: mpsc::Receiver<ResultRecord>,
    error_limit: ErrorLimit,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<RunStatistics> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move { consume_results(results_rx, error_limit, &shutdown_tx).await })
}

pub(crate) async fn consume_results(
    mut results_rx: mpsc::Receiver<ResultRecord>,
    error_limit: ErrorLimit,
    shutdown_tx: &ShutdownSender,
) -> RunStatistics {
    let mut statistics = RunStatistics::default();
    let mut failure_log = FailureLog::default();

    while let Some(record) = results_rx.recv().await {
        match record.classify() {
            Outcome::Success { bytes } => statistics.record_success(bytes),
            Outcome::Failure(cause) => {
                statistics.record_failure();
                if failure_log.should_log(&cause) {
                    error!("{}", cause);
                }
                if error_limit.is_reached(statistics.errors) {
                    trigger_shutdown(shutdown_tx);
                    error!("maximum error limit reached: {}", statistics.errors);
                    statistics.limit_reached = true;
                    return statistics;
                }
            }
        }
    }

    statistics
}
