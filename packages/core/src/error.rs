// Типы ошибок

use thiserror::Error;

/// Every failure an encoder or the dispatcher can report.
///
/// A password that simply does not match is not an error: `verify` returns `Ok(false)`.
/// Variants are `PartialEq` so callers can compare against them directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Envelope has the wrong shape: segment count, missing `{id}` prefix,
    /// malformed parameter block or undecodable base64.
    #[error("invalid format")]
    InvalidFormat,

    /// Routed envelope names a scheme that is not registered.
    #[error("unknown encoding")]
    UnknownEncoding,

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The OS random source could not supply salt bytes. Callers may retry.
    #[error("random source failure: {0}")]
    RandomSource(String),

    /// The underlying KDF rejected its parameters or failed internally.
    #[error("primitive failure: {0}")]
    Primitive(String),

    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl From<rand::Error> for PasswordError {
    fn from(err: rand::Error) -> Self {
        PasswordError::RandomSource(err.to_string())
    }
}

impl From<base64::DecodeError> for PasswordError {
    fn from(_: base64::DecodeError) -> Self {
        PasswordError::InvalidFormat
    }
}

impl From<serde_json::Error> for PasswordError {
    fn from(err: serde_json::Error) -> Self {
        PasswordError::Configuration(err.to_string())
    }
}

impl PasswordError {
    /// Re-tags a primitive rejection raised while validating constructor parameters.
    pub(crate) fn into_configuration(self) -> Self {
        match self {
            PasswordError::Primitive(msg) => PasswordError::Configuration(msg),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, PasswordError>;
