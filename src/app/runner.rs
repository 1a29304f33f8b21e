use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::{
    args::{ErrorLimit, PositiveU64, PositiveUsize},
    config::RunConfig,
    error::AppResult,
    http::{
        DispatchReport, PoolReport, ReqwestTransport, RequestDescriptor, RequestTemplate,
        ResultRecord, Transport, WorkerPool, spawn_dispatcher,
    },
    metrics::{self, RunStatistics, RunSummary},
    shutdown::{ShutdownSender, setup_signal_shutdown_handler, shutdown_channel},
};

use super::summary;

/// Smallest bound tokio allows; the dispatcher stays one step ahead of idle workers.
const REQUEST_QUEUE_CAPACITY: usize = 1;

#[derive(Debug, Clone, Copy)]
pub(crate) struct PipelinePlan {
    pub(crate) requests: PositiveU64,
    pub(crate) concurrency: PositiveUsize,
    pub(crate) error_limit: ErrorLimit,
}

impl From<&RunConfig> for PipelinePlan {
    fn from(config: &RunConfig) -> Self {
        Self {
            requests: config.requests,
            concurrency: config.concurrency,
            error_limit: config.error_limit,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RunOutcome {
    pub(crate) statistics: RunStatistics,
    pub(crate) dispatch: DispatchReport,
    pub(crate) pool: PoolReport,
    /// Measured when the consumer returns, before the pool is joined.
    pub(crate) duration: Duration,
}

/// Runs one load test against the configured target and prints the report.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be built or a pipeline task
/// panics.
pub async fn run_local(config: RunConfig) -> AppResult<()> {
    summary::print_banner(&config);

    let transport = ReqwestTransport::new(config.concurrency.get())?;
    let template = RequestTemplate::from_config(&config);
    let shutdown_tx = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    summary::print_waiting();
    let result = run_pipeline(
        transport,
        template,
        PipelinePlan::from(&config),
        &shutdown_tx,
    )
    .await;
    signal_handle.abort();
    let outcome = result?;

    if outcome.statistics.errors > 0 {
        error!("total errors: {}", outcome.statistics.errors);
    }
    summary::print_summary(&RunSummary::new(&outcome.statistics, outcome.duration));
    Ok(())
}

/// Wires dispatcher, worker pool, and consumer together and waits for all three.
///
/// # Errors
///
/// Returns an error when one of the pipeline tasks panics.
pub(crate) async fn run_pipeline<T>(
    transport: T,
    template: RequestTemplate,
    plan: PipelinePlan,
    shutdown_tx: &ShutdownSender,
) -> AppResult<RunOutcome>
where
    T: Transport + 'static,
{
    let (requests_tx, requests_rx) = mpsc::channel::<RequestDescriptor>(REQUEST_QUEUE_CAPACITY);
    let (results_tx, results_rx) = mpsc::channel::<ResultRecord>(plan.concurrency.get());

    let run_start = Instant::now();
    let dispatcher_handle =
        spawn_dispatcher(template, plan.requests.get(), requests_tx, shutdown_tx);
    let pool_handle =
        WorkerPool::new(transport, plan.concurrency).spawn(requests_rx, results_tx, shutdown_tx);
    let consumer_handle = metrics::setup_result_consumer(results_rx, plan.error_limit, shutdown_tx);

    let statistics = consumer_handle.await?;
    let duration = run_start.elapsed();

    let dispatch = dispatcher_handle.await?;
    let pool = pool_handle.await?;
    debug!(
        dispatched = dispatch.dispatched,
        skipped = dispatch.skipped,
        workers = pool.workers(),
        handled = pool.handled(),
        "Pipeline finished"
    );

    Ok(RunOutcome {
        statistics,
        dispatch,
        pool,
        duration,
    })
}
