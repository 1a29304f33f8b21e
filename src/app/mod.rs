mod runner;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub use runner::run_local;
pub(crate) use runner::{PipelinePlan, RunOutcome, run_pipeline};
