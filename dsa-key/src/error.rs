//! Error types

use crate::{Algorithm, Component};
use core::fmt;

/// Result type with `dsa-key`'s [`Error`] as the error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type.
///
/// None of the messages produced by this type contain key material.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// Operation is not valid in the key's current state.
    ///
    /// Returned when copying into a key that already holds components, or when
    /// the copy source has no private key.
    State {
        /// Why the operation was refused.
        reason: &'static str,
    },

    /// Input could not be decoded as any supported DSA key encoding.
    Format,

    /// Input was decoded successfully, but it holds a key of another algorithm.
    TypeMismatch {
        /// Algorithm of the decoded key.
        algorithm: Algorithm,
    },

    /// A component required by the operation is absent.
    IncompleteKey {
        /// The missing component.
        component: Component,
    },

    /// Operation requires the private component.
    PrivateKeyRequired,

    /// Underlying cryptographic operation failed.
    ///
    /// This covers malformed signatures, degenerate key material detected
    /// during signing or verification and failed nonce generation.
    Crypto,

    /// Passphrase is missing or too long.
    Passphrase,

    /// PEM cipher name is not supported.
    CipherUnsupported,

    /// Requested key size can't be generated.
    KeySize,

    /// ASN.1 DER encoding errors.
    Encoding(der::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::State { reason } => write!(f, "invalid DSA key state: {reason}"),
            Error::Format => write!(f, "neither public nor private DSA key recognized"),
            Error::TypeMismatch { algorithm } => write!(f, "incorrect pkey type: {algorithm}"),
            Error::IncompleteKey { component } => {
                write!(f, "incomplete DSA key: missing {component}")
            }
            Error::PrivateKeyRequired => write!(f, "private DSA key needed"),
            Error::Crypto => write!(f, "DSA operation failed"),
            Error::Passphrase => write!(f, "passphrase missing or longer than 1024 bytes"),
            Error::CipherUnsupported => write!(f, "unsupported PEM cipher"),
            Error::KeySize => write!(f, "unsupported DSA key size"),
            Error::Encoding(err) => write!(f, "DER encoding error: {err}"),
        }
    }
}

impl core::error::Error for Error {}

impl From<der::Error> for Error {
    fn from(err: der::Error) -> Error {
        Error::Encoding(err)
    }
}

impl From<pkcs8::Error> for Error {
    fn from(_: pkcs8::Error) -> Error {
        Error::Format
    }
}

impl From<pkcs8::spki::Error> for Error {
    fn from(_: pkcs8::spki::Error) -> Error {
        Error::Format
    }
}

impl From<pem_rfc7468::Error> for Error {
    fn from(_: pem_rfc7468::Error) -> Error {
        Error::Format
    }
}

impl From<Error> for signature::Error {
    fn from(_: Error) -> signature::Error {
        signature::Error::new()
    }
}
