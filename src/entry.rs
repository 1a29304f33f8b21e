use std::num::NonZeroUsize;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::app::run_local;
use crate::args::TensileArgs;
use crate::config::RunConfig;
use crate::error::AppResult;

/// Parses the command line, resolves configuration, and runs one load test
/// on a runtime sized by `--cpu`.
///
/// # Errors
///
/// Returns an error when arguments or configuration are invalid, the runtime
/// cannot be built, or the run itself fails.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose);

    apply_config(&mut args, &matches)?;
    let available_cpus = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
    let config = RunConfig::resolve(&args, available_cpus)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(run_local(config))
}

fn parse_args() -> AppResult<(TensileArgs, ArgMatches)> {
    let matches = TensileArgs::command().get_matches();
    let args = TensileArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn apply_config(args: &mut TensileArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(config) = crate::config::load_config(args.config.as_deref())? {
        crate::config::apply_config(args, matches, &config)?;
    }
    Ok(())
}
