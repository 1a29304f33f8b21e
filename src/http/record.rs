use std::fmt;

/// Lowest status code counted as a failed request.
const FIRST_FAILURE_STATUS: u16 = 400;

/// What a worker hands to the consumer for one request.
///
/// The response body has already been drained and released by the time a
/// record exists, so dropping a record never leaks a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultRecord {
    Response {
        status: u16,
        /// Declared body size; `None` when the server did not report one.
        content_length: Option<u64>,
    },
    TransportFailure {
        cause: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    Status(u16),
    Transport(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Status(code) => {
                let reason = http::StatusCode::from_u16(*code)
                    .ok()
                    .and_then(|status| status.canonical_reason());
                match reason {
                    Some(reason) => write!(f, "{} {}", code, reason),
                    None => write!(f, "{}", code),
                }
            }
            FailureCause::Transport(cause) => f.write_str(cause),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { bytes: u64 },
    Failure(FailureCause),
}

impl ResultRecord {
    /// Splits a record into success (with the bytes it contributes) or failure.
    ///
    /// Status codes below 400 are successes; an unknown size counts as zero.
    #[must_use]
    pub fn classify(self) -> Outcome {
        match self {
            ResultRecord::Response { status, .. } if status >= FIRST_FAILURE_STATUS => {
                Outcome::Failure(FailureCause::Status(status))
            }
            ResultRecord::Response { content_length, .. } => Outcome::Success {
                bytes: content_length.unwrap_or(0),
            },
            ResultRecord::TransportFailure { cause } => {
                Outcome::Failure(FailureCause::Transport(cause))
            }
        }
    }
}
