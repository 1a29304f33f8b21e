use tracing::warn;
use url::Url;

use crate::args::{DEFAULT_USER_AGENT, ErrorLimit, PositiveU64, PositiveUsize, TensileArgs};
use crate::error::{AppError, AppResult, ValidationError};

/// Fully validated settings for one run.
///
/// Everything downstream of this type assumes the invariants checked in
/// [`RunConfig::resolve`]: an absolute http(s) URL, `concurrency <= requests`,
/// and at least one runtime worker thread.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub url: Url,
    pub requests: PositiveU64,
    pub concurrency: PositiveUsize,
    pub error_limit: ErrorLimit,
    pub worker_threads: usize,
    pub headers: Vec<(String, String)>,
    pub user_agent: Option<&'static str>,
}

impl RunConfig {
    /// Validates arguments and clamps values that are merely too large.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is blank, unparsable, or not http/https.
    pub fn resolve(args: &TensileArgs, available_cpus: usize) -> AppResult<Self> {
        let url = parse_target_url(&args.url)?;
        let requests = args.requests;

        let mut worker_threads = args.cpu;
        let available_cpus = available_cpus.max(1);
        if worker_threads > available_cpus {
            warn!(
                "-cpu={} is greater than the number of CPUs on this system. Changing -cpu to {}.",
                worker_threads, available_cpus
            );
            worker_threads = available_cpus;
        }
        if worker_threads < 1 {
            warn!("-cpu={} is less than 1. Changing -cpu to 1.", worker_threads);
            worker_threads = 1;
        }

        let mut concurrency = args.concurrent;
        if u64::try_from(concurrency.get()).map_or(true, |value| value > requests.get())
            && let Ok(clamped) =
                PositiveUsize::try_from(usize::try_from(requests.get()).unwrap_or(usize::MAX))
        {
            warn!(
                "-concurrent={} is greater than -requests. Changing -concurrent to {}.",
                concurrency.get(),
                clamped.get()
            );
            concurrency = clamped;
        }

        Ok(Self {
            url,
            requests,
            concurrency,
            error_limit: args.max_error,
            worker_threads,
            headers: args.headers.clone(),
            user_agent: if args.no_ua {
                None
            } else {
                Some(DEFAULT_USER_AGENT)
            },
        })
    }
}

fn parse_target_url(value: &str) -> AppResult<Url> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(ValidationError::MissingUrl));
    }
    let url = Url::parse(trimmed).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: trimmed.to_owned(),
            source: err,
        })
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::validation(ValidationError::UnsupportedScheme {
            scheme: other.to_owned(),
        })),
    }
}
