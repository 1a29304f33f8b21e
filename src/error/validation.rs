use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("-maxerror (-e) must be greater than 0, or -1 for unlimited (got '{value}').")]
    InvalidErrorLimit { value: String },
    #[error("-url (-u) cannot be blank.")]
    MissingUrl,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported protocol scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
}
