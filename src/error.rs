//! Failure taxonomy for resource operations.

use crate::coap::Code;
use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything a resource operation can fail with. Each failure is
/// converted, at the dispatch boundary, into exactly one response code;
/// nothing is silently dropped or retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed or unsupported value was supplied.
    #[error("invalid argument")]
    InvalidArgument,

    /// A payload-level problem, such as a reading that does not fit the
    /// response buffer.
    #[error("bad data")]
    BadData,

    /// The resource is disabled and refuses live reads.
    #[error("operation not supported")]
    Unsupported,

    /// An unexpected failure from a driver or the platform.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// The response code this failure maps to. Invalid arguments, bad
    /// data, and reads against a disabled resource reject the request as
    /// not-acceptable; everything else is an internal error.
    #[must_use]
    pub fn code(&self) -> Code {
        match self {
            Error::InvalidArgument | Error::BadData | Error::Unsupported => Code::NotAcceptable,
            Error::Internal(_) => Code::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn code_mapping() {
        assert_eq!(Error::InvalidArgument.code(), Code::NotAcceptable);
        assert_eq!(Error::BadData.code(), Code::NotAcceptable);
        assert_eq!(Error::Unsupported.code(), Code::NotAcceptable);
        assert_eq!(
            Error::Internal(anyhow!("driver exploded")).code(),
            Code::InternalError
        );
    }
}
