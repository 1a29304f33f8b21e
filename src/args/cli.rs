use clap::Parser;

use super::defaults::{
    DEFAULT_CONCURRENT, DEFAULT_CPU, DEFAULT_MAX_ERROR, DEFAULT_REQUESTS, DEFAULT_URL,
};
use super::parsers::{parse_error_limit, parse_header, parse_positive_u64, parse_positive_usize};
use super::types::{ErrorLimit, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Bounded-concurrency HTTP stress tester: sends a fixed number of requests with capped parallelism and stops early once an error threshold is reached."
)]
pub struct TensileArgs {
    /// Target URL
    #[arg(long, short = 'u', env = "TENSILE_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Total requests
    #[arg(
        long = "requests",
        short = 'r',
        default_value = DEFAULT_REQUESTS,
        value_parser = parse_positive_u64
    )]
    pub requests: PositiveU64,

    /// Maximum concurrent requests
    #[arg(
        long = "concurrent",
        short = 'c',
        default_value = DEFAULT_CONCURRENT,
        value_parser = parse_positive_usize
    )]
    pub concurrent: PositiveUsize,

    /// Maximum errors before exiting (-1 or "unlimited" to never stop early)
    #[arg(
        long = "maxerror",
        short = 'e',
        alias = "max-error",
        default_value = DEFAULT_MAX_ERROR,
        allow_hyphen_values = true,
        value_parser = parse_error_limit
    )]
    pub max_error: ErrorLimit,

    /// Number of runtime worker threads
    #[arg(long = "cpu", default_value = DEFAULT_CPU)]
    pub cpu: usize,

    /// Extra HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Do not send the identifying User-Agent header
    #[arg(long = "no-ua")]
    pub no_ua: bool,

    /// Path to a TOML or JSON config file (defaults to ./tensile.toml or ./tensile.json)
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
