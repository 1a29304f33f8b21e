use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::args::PositiveUsize;
use crate::shutdown::{ShutdownReceiver, ShutdownSender, wait_for_shutdown};

use super::descriptor::RequestDescriptor;
use super::record::ResultRecord;
use super::transport::Transport;

type SharedRequests = Arc<Mutex<mpsc::Receiver<RequestDescriptor>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolReport {
    /// Requests executed by each worker, indexed by worker id.
    pub handled_per_worker: Vec<u64>,
}

impl PoolReport {
    #[must_use]
    pub fn workers(&self) -> usize {
        self.handled_per_worker.len()
    }

    #[must_use]
    pub fn handled(&self) -> u64 {
        self.handled_per_worker
            .iter()
            .fold(0_u64, |total, handled| total.saturating_add(*handled))
    }
}

/// Fixed-size set of workers sharing one transport.
pub struct WorkerPool<T> {
    transport: Arc<T>,
    workers: PositiveUsize,
}

impl<T> WorkerPool<T>
where
    T: Transport + 'static,
{
    #[must_use]
    pub fn new(transport: T, workers: PositiveUsize) -> Self {
        Self {
            transport: Arc::new(transport),
            workers,
        }
    }

    /// Starts every worker and returns a handle that resolves once all of
    /// them have exited.
    ///
    /// Every worker is subscribed to shutdown before the first one starts, so
    /// none can miss an early signal. The result stream closes when the last
    /// worker drops its sender, and the shared transport is released after
    /// the join on every exit path.
    #[must_use]
    pub fn spawn(
        self,
        requests_rx: mpsc::Receiver<RequestDescriptor>,
        results_tx: mpsc::Sender<ResultRecord>,
        shutdown_tx: &ShutdownSender,
    ) -> JoinHandle<PoolReport> {
        let worker_count = self.workers.get();
        let requests: SharedRequests = Arc::new(Mutex::new(requests_rx));
        let receivers: Vec<ShutdownReceiver> =
            (0..worker_count).map(|_| shutdown_tx.subscribe()).collect();

        let mut worker_handles = Vec::with_capacity(worker_count);
        for (worker_id, shutdown_rx) in receivers.into_iter().enumerate() {
            let handle = tokio::spawn(run_worker(
                worker_id,
                Arc::clone(&self.transport),
                Arc::clone(&requests),
                results_tx.clone(),
                shutdown_rx,
            ));
            worker_handles.push(handle);
        }
        drop(results_tx);
        drop(requests);

        let transport = self.transport;
        tokio::spawn(async move {
            let mut report = PoolReport {
                handled_per_worker: Vec::with_capacity(worker_handles.len()),
            };
            for handle in worker_handles {
                match handle.await {
                    Ok(handled) => report.handled_per_worker.push(handled),
                    Err(err) => {
                        error!("Worker task failed: {}", err);
                        report.handled_per_worker.push(0);
                    }
                }
            }
            debug!(
                workers = report.workers(),
                handled = report.handled(),
                "Worker pool finished, releasing HTTP client"
            );
            drop(transport);
            report
        })
    }
}

async fn run_worker<T>(
    worker_id: usize,
    transport: Arc<T>,
    requests: SharedRequests,
    results_tx: mpsc::Sender<ResultRecord>,
    mut shutdown_rx: ShutdownReceiver,
) -> u64
where
    T: Transport + ?Sized,
{
    let mut handled: u64 = 0;
    loop {
        // Shutdown wins ties so no new request starts after it fires.
        let next = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut shutdown_rx) => None,
            descriptor = next_descriptor(&requests) => descriptor,
        };
        let Some(descriptor) = next else {
            break;
        };

        // In-flight requests are not interrupted by shutdown.
        let record = transport.execute(descriptor).await;
        handled = handled.saturating_add(1);

        if results_tx.send(record).await.is_err() {
            break;
        }
    }
    debug!(worker_id, handled, "Worker exiting");
    handled
}

async fn next_descriptor(
    requests: &Mutex<mpsc::Receiver<RequestDescriptor>>,
) -> Option<RequestDescriptor> {
    requests.lock().await.recv().await
}
