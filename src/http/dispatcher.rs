use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::shutdown::{ShutdownSender, wait_for_shutdown};

use super::descriptor::{RequestDescriptor, RequestTemplate};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub dispatched: u64,
    pub skipped: u64,
    pub cancelled: bool,
}

/// Spawns the task that feeds `total` descriptors into the request stream.
///
/// The stream is closed when the task returns, after the last descriptor or
/// as soon as shutdown is observed. Descriptors that fail to build are logged
/// and skipped.
#[must_use]
pub fn spawn_dispatcher(
    template: RequestTemplate,
    total: u64,
    requests_tx: mpsc::Sender<RequestDescriptor>,
    shutdown_tx: &ShutdownSender,
) -> JoinHandle<DispatchReport> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut report = DispatchReport::default();

        for seq in 0..total {
            let descriptor = match template.build(seq) {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    warn!("Skipping request {}: {}", seq, err);
                    report.skipped = report.skipped.saturating_add(1);
                    continue;
                }
            };

            tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    report.cancelled = true;
                    break;
                }
                sent = requests_tx.send(descriptor) => {
                    if sent.is_err() {
                        break;
                    }
                    report.dispatched = report.dispatched.saturating_add(1);
                }
            }
        }

        debug!(
            dispatched = report.dispatched,
            skipped = report.skipped,
            cancelled = report.cancelled,
            "Dispatcher finished"
        );
        report
    })
}
