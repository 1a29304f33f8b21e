use super::{PipelinePlan, RunOutcome, run_pipeline};
use crate::args::{ErrorLimit, PositiveU64, PositiveUsize};
use crate::http::{RequestDescriptor, RequestTemplate, ResultRecord, Transport};
use crate::shutdown::{ShutdownSender, shutdown_channel, trigger_shutdown};
use async_trait::async_trait;
use reqwest::Method;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

#[derive(Default)]
struct TransportGauge {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    executed: AtomicU64,
    released: AtomicBool,
}

struct FakeTransport {
    gauge: Arc<TransportGauge>,
    delay: Duration,
    respond: fn(u64) -> ResultRecord,
}

impl FakeTransport {
    fn new(delay: Duration, respond: fn(u64) -> ResultRecord) -> (Self, Arc<TransportGauge>) {
        let gauge = Arc::new(TransportGauge::default());
        (
            Self {
                gauge: Arc::clone(&gauge),
                delay,
                respond,
            },
            gauge,
        )
    }
}

impl Drop for FakeTransport {
    fn drop(&mut self) {
        self.gauge.released.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, descriptor: RequestDescriptor) -> ResultRecord {
        let now = self
            .gauge
            .in_flight
            .fetch_add(1, Ordering::SeqCst)
            .saturating_add(1);
        self.gauge.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.gauge.executed.fetch_add(1, Ordering::SeqCst);
        self.gauge.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.respond)(descriptor.seq)
    }
}

fn ok_15_bytes(_seq: u64) -> ResultRecord {
    ResultRecord::Response {
        status: 200,
        content_length: Some(15),
    }
}

fn always_500(_seq: u64) -> ResultRecord {
    ResultRecord::Response {
        status: 500,
        content_length: Some(15),
    }
}

fn seventh_fails(seq: u64) -> ResultRecord {
    if seq == 6 {
        ResultRecord::TransportFailure {
            cause: "connection reset".to_owned(),
        }
    } else {
        ok_15_bytes(seq)
    }
}

fn plan(requests: u64, concurrency: usize, error_limit: ErrorLimit) -> Result<PipelinePlan, String> {
    Ok(PipelinePlan {
        requests: PositiveU64::try_from(requests).map_err(|err| err.to_string())?,
        concurrency: PositiveUsize::try_from(concurrency).map_err(|err| err.to_string())?,
        error_limit,
    })
}

fn limit(value: u64) -> Result<ErrorLimit, String> {
    PositiveU64::try_from(value)
        .map(ErrorLimit::After)
        .map_err(|err| err.to_string())
}

fn template() -> RequestTemplate {
    RequestTemplate::new(Method::GET, "http://localhost/", vec![])
}

async fn run(
    transport: FakeTransport,
    plan: PipelinePlan,
    shutdown_tx: &ShutdownSender,
) -> Result<RunOutcome, String> {
    tokio::time::timeout(
        Duration::from_secs(20),
        run_pipeline(transport, template(), plan, shutdown_tx),
    )
    .await
    .map_err(|_elapsed| "Pipeline did not finish".to_owned())?
    .map_err(|err| err.to_string())
}

#[test]
fn thousand_requests_with_two_hundred_workers() -> Result<(), String> {
    run_async_test(async {
        let (transport, gauge) = FakeTransport::new(Duration::from_millis(1), ok_15_bytes);
        let shutdown_tx = shutdown_channel();
        let outcome = run(transport, plan(1000, 200, limit(1)?)?, &shutdown_tx).await?;

        if outcome.statistics.completed != 1000 {
            return Err(format!("Expected 1000 completed, got {}", outcome.statistics.completed));
        }
        if outcome.statistics.total_bytes != 15_000 {
            return Err(format!(
                "Expected 15000 bytes, got {}",
                outcome.statistics.total_bytes
            ));
        }
        if outcome.pool.workers() != 200 {
            return Err(format!("Expected 200 workers, got {}", outcome.pool.workers()));
        }
        if outcome.pool.handled() != 1000 || outcome.dispatch.dispatched != 1000 {
            return Err(format!(
                "Expected every request handled once: {:?} {:?}",
                outcome.pool.handled(),
                outcome.dispatch
            ));
        }
        if gauge.max_in_flight.load(Ordering::SeqCst) > 200 {
            return Err(format!(
                "In-flight requests exceeded concurrency: {}",
                gauge.max_in_flight.load(Ordering::SeqCst)
            ));
        }
        if !gauge.released.load(Ordering::SeqCst) {
            return Err("Transport was not released after the pool finished".to_owned());
        }
        Ok(())
    })
}

#[test]
fn concurrency_clamped_to_request_count() -> Result<(), String> {
    run_async_test(async {
        let args = <crate::args::TensileArgs as clap::Parser>::try_parse_from([
            "tensile", "-r", "100", "-c", "200",
        ])
        .map_err(|err| err.to_string())?;
        let config = crate::config::RunConfig::resolve(&args, 1).map_err(|err| err.to_string())?;

        let (transport, _gauge) = FakeTransport::new(Duration::ZERO, ok_15_bytes);
        let shutdown_tx = shutdown_channel();
        let outcome = run(transport, PipelinePlan::from(&config), &shutdown_tx).await?;

        if outcome.pool.workers() != 100 {
            return Err(format!("Expected 100 workers, got {}", outcome.pool.workers()));
        }
        if outcome.statistics.completed != 100 {
            return Err(format!("Expected 100 completed, got {}", outcome.statistics.completed));
        }
        Ok(())
    })
}

#[test]
fn every_worker_takes_a_share_of_slow_requests() -> Result<(), String> {
    run_async_test(async {
        let (transport, gauge) = FakeTransport::new(Duration::from_millis(20), ok_15_bytes);
        let shutdown_tx = shutdown_channel();
        let outcome = run(transport, plan(40, 4, ErrorLimit::Unlimited)?, &shutdown_tx).await?;

        if outcome.pool.handled_per_worker.iter().any(|handled| *handled == 0) {
            return Err(format!(
                "A worker sat idle while work remained: {:?}",
                outcome.pool.handled_per_worker
            ));
        }
        if gauge.max_in_flight.load(Ordering::SeqCst) > 4 {
            return Err("In-flight requests exceeded concurrency".to_owned());
        }
        if outcome.statistics.completed != 40 {
            return Err(format!("Expected 40 completed, got {}", outcome.statistics.completed));
        }
        Ok(())
    })
}

#[test]
fn all_failures_halt_at_threshold() -> Result<(), String> {
    run_async_test(async {
        let (transport, gauge) = FakeTransport::new(Duration::from_millis(1), always_500);
        let shutdown_tx = shutdown_channel();
        let outcome = run(transport, plan(500, 10, limit(5)?)?, &shutdown_tx).await?;

        if outcome.statistics.errors != 5 {
            return Err(format!("Expected 5 errors, got {}", outcome.statistics.errors));
        }
        if outcome.statistics.completed != 0 {
            return Err(format!("Expected 0 completed, got {}", outcome.statistics.completed));
        }
        if !outcome.statistics.limit_reached {
            return Err("Expected limit_reached".to_owned());
        }
        if gauge.executed.load(Ordering::SeqCst) >= 500 {
            return Err("Cancellation did not stop new requests".to_owned());
        }
        if !gauge.released.load(Ordering::SeqCst) {
            return Err("Transport was not released after early termination".to_owned());
        }
        Ok(())
    })
}

#[test]
fn unlimited_threshold_runs_every_request() -> Result<(), String> {
    run_async_test(async {
        let (transport, _gauge) = FakeTransport::new(Duration::ZERO, always_500);
        let shutdown_tx = shutdown_channel();
        let outcome = run(transport, plan(300, 16, ErrorLimit::Unlimited)?, &shutdown_tx).await?;

        if outcome.statistics.errors != 300 {
            return Err(format!("Expected 300 errors, got {}", outcome.statistics.errors));
        }
        if outcome.statistics.limit_reached || outcome.dispatch.cancelled {
            return Err("Cancellation must never fire with an unlimited threshold".to_owned());
        }
        if outcome.pool.handled() != 300 {
            return Err(format!("Expected 300 handled, got {}", outcome.pool.handled()));
        }
        Ok(())
    })
}

#[test]
fn single_failure_halts_fifty_request_run() -> Result<(), String> {
    run_async_test(async {
        let (transport, _gauge) = FakeTransport::new(Duration::from_millis(5), seventh_fails);
        let shutdown_tx = shutdown_channel();
        let outcome = run(transport, plan(50, 5, limit(1)?)?, &shutdown_tx).await?;

        if outcome.statistics.errors != 1 {
            return Err(format!("Expected 1 error, got {}", outcome.statistics.errors));
        }
        if outcome.statistics.completed > 49 {
            return Err(format!(
                "Expected at most 49 completed, got {}",
                outcome.statistics.completed
            ));
        }
        if !outcome.statistics.limit_reached {
            return Err("Expected the run to halt on the first error".to_owned());
        }
        Ok(())
    })
}

#[test]
fn external_shutdown_stops_dispatch_and_workers() -> Result<(), String> {
    run_async_test(async {
        let (transport, gauge) = FakeTransport::new(Duration::from_millis(10), ok_15_bytes);
        let shutdown_tx = shutdown_channel();
        let trigger_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger_shutdown(&trigger_tx);
            trigger_shutdown(&trigger_tx);
        });

        let outcome = run(transport, plan(10_000, 4, limit(1)?)?, &shutdown_tx).await?;

        if !outcome.dispatch.cancelled {
            return Err("Dispatcher should have observed shutdown".to_owned());
        }
        if outcome.statistics.completed >= 10_000 {
            return Err("Shutdown did not cut the run short".to_owned());
        }
        if outcome.statistics.completed != gauge.executed.load(Ordering::SeqCst) {
            return Err(format!(
                "Every executed request should be counted: {} vs {}",
                outcome.statistics.completed,
                gauge.executed.load(Ordering::SeqCst)
            ));
        }
        Ok(())
    })
}

#[test]
fn malformed_descriptors_are_skipped() -> Result<(), String> {
    run_async_test(async {
        let (transport, gauge) = FakeTransport::new(Duration::ZERO, ok_15_bytes);
        let shutdown_tx = shutdown_channel();
        let bad_template = RequestTemplate::new(
            Method::GET,
            "http://localhost/",
            vec![("Bad Header".to_owned(), "x".to_owned())],
        );
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            run_pipeline(transport, bad_template, plan(20, 4, limit(1)?)?, &shutdown_tx),
        )
        .await
        .map_err(|_elapsed| "Pipeline did not finish".to_owned())?
        .map_err(|err| err.to_string())?;

        if outcome.dispatch.skipped != 20 || outcome.dispatch.dispatched != 0 {
            return Err(format!("Expected all 20 skipped: {:?}", outcome.dispatch));
        }
        if gauge.executed.load(Ordering::SeqCst) != 0 || outcome.statistics.completed != 0 {
            return Err("No request should have been executed".to_owned());
        }
        if outcome.pool.workers() != 4 {
            return Err(format!("Expected 4 workers, got {}", outcome.pool.workers()));
        }
        Ok(())
    })
}
