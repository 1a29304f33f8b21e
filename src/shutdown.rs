//! Run-wide cancellation signal.
//!
//! The signal is a broadcast channel: the consumer (or an OS signal) fires it,
//! and every dispatcher/worker holds its own receiver. Firing never blocks and
//! may happen any number of times; a receiver that observes a message, a lag,
//! or a closed channel treats all three as "stop".
use tokio::sync::broadcast;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

pub type ShutdownSender = broadcast::Sender<()>;
pub type ShutdownReceiver = broadcast::Receiver<()>;

/// One slot is enough: every receiver keeps its own cursor, and a lagged
/// receiver still wakes up.
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> ShutdownSender {
    let (shutdown_tx, _) = broadcast::channel::<()>(SHUTDOWN_CHANNEL_CAPACITY);
    shutdown_tx
}

/// Fires the signal. Safe to call repeatedly and with no live receivers.
pub fn trigger_shutdown(shutdown_tx: &ShutdownSender) {
    drop(shutdown_tx.send(()));
}

/// Resolves once the signal has fired or every sender is gone.
pub async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    drop(shutdown_rx.recv().await);
}

/// Fires the signal on Ctrl+C or SIGTERM so an interrupted run still drains
/// in-flight requests and reports.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut shutdown_rx = shutdown_tx.subscribe();

        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                tracing::warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, waiting for in-flight requests.");
                    trigger_shutdown(&shutdown_tx);
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    tracing::warn!("Terminated, waiting for in-flight requests.");
                    trigger_shutdown(&shutdown_tx);
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, waiting for in-flight requests.");
                    trigger_shutdown(&shutdown_tx);
                }
            }
        }
    })
}
