use thiserror::Error;

/// Everything that can go wrong in this crate.
///
/// Arithmetic never silently produces a sentinel value, it fails with
/// [`Error::Arithmetic`] instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Malformed numeric string, unsupported radix, unusable bit length,
    /// unknown algorithm name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Division by zero, non-invertible element, non-positive modulus.
    #[error("arithmetic error: {0}")]
    Arithmetic(&'static str),

    /// The host cannot provide the requested parallel workers.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// The random source failed to deliver bytes.
    #[error("random source failure: {0}")]
    Rng(String),
}

/// [`Error`] or success.
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArgument(reason.into())
    }
}

impl From<rand_core::Error> for Error {
    fn from(error: rand_core::Error) -> Self {
        Error::Rng(error.to_string())
    }
}
