use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, redirect};
use tracing::{debug, error};

use crate::error::{AppError, AppResult, HttpError};

use super::descriptor::RequestDescriptor;
use super::record::ResultRecord;

/// Executes one request and reports what happened.
///
/// Implementations are shared read-only by every worker in a pool, and must
/// release any per-response resources before returning.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, descriptor: RequestDescriptor) -> ResultRecord;
}

/// [`Transport`] backed by one pooled `reqwest` client.
///
/// Dropping the last handle drops the client and closes its idle connections.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client that keeps up to `max_idle_per_host` idle connections,
    /// one per worker.
    ///
    /// Redirects are never followed: a 3xx reply is the result of its request.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(max_idle_per_host: usize) -> AppResult<Self> {
        let client = match Client::builder()
            .pool_max_idle_per_host(max_idle_per_host)
            .redirect(redirect::Policy::none())
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to build HTTP client: {}", e);
                return Err(AppError::http(HttpError::BuildClientFailed { source: e }));
            }
        };
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, descriptor: RequestDescriptor) -> ResultRecord {
        let seq = descriptor.seq;
        match self.client.execute(descriptor.into_request()).await {
            Ok(response) => {
                let status = response.status().as_u16();
                let content_length = response.content_length();
                match drain_response_body(response).await {
                    Ok(read) => {
                        debug!(seq, status, read, "Response drained");
                        ResultRecord::Response {
                            status,
                            content_length,
                        }
                    }
                    Err(err) => ResultRecord::TransportFailure {
                        cause: format!("Failed to read response body: {}", err),
                    },
                }
            }
            Err(err) => ResultRecord::TransportFailure {
                cause: err.to_string(),
            },
        }
    }
}

/// Reads the body to the end so the connection can go back to the pool.
async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
