//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::TensileArgs;
pub use types::{ErrorLimit, PositiveU64, PositiveUsize};

pub(crate) use defaults::{APP_BANNER, DEFAULT_USER_AGENT};
pub(crate) use parsers::parse_header;
