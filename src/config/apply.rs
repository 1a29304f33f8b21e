use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{ErrorLimit, PositiveU64, PositiveUsize, TensileArgs, parse_header};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// Flags given on the command line (or through their environment variable)
/// always win over the file.
///
/// # Errors
///
/// Returns an error when a config value is out of range or malformed.
pub fn apply_config(
    args: &mut TensileArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = PositiveU64::try_from(requests).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "requests",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "concurrent")
        && let Some(concurrent) = config.concurrent
    {
        args.concurrent = PositiveUsize::try_from(concurrent).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "concurrent",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "max_error")
        && let Some(max_error) = config.maxerror
    {
        args.max_error = ErrorLimit::try_from(max_error).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "maxerror",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "cpu")
        && let Some(cpu) = config.cpu
    {
        args.cpu = cpu;
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(
                parse_header(header)
                    .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
            );
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "no_ua")
        && let Some(no_ua) = config.no_ua
    {
        args.no_ua = no_ua;
    }

    Ok(())
}

/// Environment fallbacks count as explicit, like flags.
fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
