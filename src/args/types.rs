use std::num::{NonZeroU64, NonZeroUsize};

use crate::error::ValidationError;

/// Spelling of the unlimited error threshold on the command line.
const UNLIMITED_SENTINEL: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveU64(NonZeroU64);

impl PositiveU64 {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl TryFrom<u64> for PositiveU64 {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(value)
            .map(PositiveU64)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveU64 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveU64::try_from(value)
    }
}

impl From<PositiveU64> for u64 {
    fn from(value: PositiveU64) -> Self {
        value.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositiveUsize(NonZeroUsize);

impl PositiveUsize {
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for PositiveUsize {
    type Error = ValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value)
            .map(PositiveUsize)
            .ok_or(ValidationError::ValueTooSmall { min: 1 })
    }
}

impl std::str::FromStr for PositiveUsize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: usize = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidNumber { source: err })?;
        PositiveUsize::try_from(value)
    }
}

impl From<PositiveUsize> for usize {
    fn from(value: PositiveUsize) -> Self {
        value.get()
    }
}

/// Number of failed requests after which a run stops early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLimit {
    Unlimited,
    After(PositiveU64),
}

impl ErrorLimit {
    #[must_use]
    pub const fn is_reached(self, errors: u64) -> bool {
        match self {
            ErrorLimit::Unlimited => false,
            ErrorLimit::After(limit) => errors >= limit.get(),
        }
    }
}

impl TryFrom<i64> for ErrorLimit {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == UNLIMITED_SENTINEL {
            return Ok(ErrorLimit::Unlimited);
        }
        u64::try_from(value)
            .ok()
            .and_then(|value| PositiveU64::try_from(value).ok())
            .map(ErrorLimit::After)
            .ok_or_else(|| ValidationError::InvalidErrorLimit {
                value: value.to_string(),
            })
    }
}

impl std::str::FromStr for ErrorLimit {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        if normalized.eq_ignore_ascii_case("unlimited") {
            return Ok(ErrorLimit::Unlimited);
        }
        let value: i64 = normalized
            .parse()
            .map_err(|_err| ValidationError::InvalidErrorLimit {
                value: s.to_owned(),
            })?;
        ErrorLimit::try_from(value)
    }
}

impl std::fmt::Display for ErrorLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorLimit::Unlimited => write!(f, "unlimited"),
            ErrorLimit::After(limit) => write!(f, "{}", limit.get()),
        }
    }
}
