//! Core library for the `tensile` CLI.
//!
//! A run is a three-stage pipeline: a dispatcher feeds request descriptors
//! into a bounded queue, a fixed pool of workers executes them over one
//! pooled HTTP client, and a consumer tallies the results and fires the
//! shared shutdown signal once the error limit is reached. The primary
//! interface is the `tensile` binary; library APIs may evolve with it.
pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod shutdown;

mod entry;
mod logger;

pub use entry::run;
