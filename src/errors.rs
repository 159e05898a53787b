//! Error types.

use core::fmt;

/// Alias for [`core::result::Result`] with the `keycodec` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types.
///
/// Callers tell "the key data is corrupt" apart from "no such key" by
/// variant, never by message text.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// Structurally invalid or out-of-range data.
    BadData,

    /// Recognised but unsupported algorithm, curve or format combination,
    /// or a prerequisite component that hasn't been loaded.
    NotAvailable,

    /// Output limit exceeded.
    Overflow,

    /// Input exhausted in the middle of a field.
    Underflow,

    /// Keyring search found no matching entry.
    NotFound,

    /// Internal error.
    Internal,
}

impl Error {
    /// Is this a data-format error, as opposed to a lookup or internal failure?
    pub fn is_data_error(self) -> bool {
        matches!(
            self,
            Error::BadData | Error::NotAvailable | Error::Overflow | Error::Underflow
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadData => write!(f, "invalid or out-of-range key data"),
            Error::NotAvailable => write!(f, "algorithm, curve or format not available"),
            Error::Overflow => write!(f, "output buffer overflow"),
            Error::Underflow => write!(f, "input data exhausted"),
            Error::NotFound => write!(f, "no matching key found"),
            Error::Internal => write!(f, "internal error"),
        }
    }
}

impl From<pkcs8::der::Error> for Error {
    fn from(err: pkcs8::der::Error) -> Error {
        match err.kind() {
            pkcs8::der::ErrorKind::Incomplete { .. } => Error::Underflow,
            _ => Error::BadData,
        }
    }
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        match err {
            pkcs1::Error::Asn1(err) => err.into(),
            _ => Error::BadData,
        }
    }
}

impl From<pkcs8::der::oid::Error> for Error {
    fn from(_: pkcs8::der::oid::Error) -> Error {
        Error::BadData
    }
}

impl From<bytes::TryGetError> for Error {
    fn from(_: bytes::TryGetError) -> Error {
        Error::Underflow
    }
}

impl From<Error> for spki::Error {
    fn from(err: Error) -> spki::Error {
        match err {
            Error::Underflow => pkcs8::der::Error::incomplete(pkcs8::der::Length::ZERO).into(),
            _ => spki::Error::KeyMalformed,
        }
    }
}
