//! Result consumption and run statistics.
mod collector;
mod types;


pub use collector::setup_result_consumer;
pub use types::{RunStatistics, RunSummary};
