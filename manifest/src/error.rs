/*!
The error type returned when a manifest is rejected.

Every variant maps onto a stable numeric code (see [`Error::code`]) so that
callers which report results as integers keep the same values as the
firmware-update tooling that consumes them.
*/

use super::*;
use thiserror::Error;

/// The numeric code for a successfully decoded manifest.
pub const OK: u8 = 0x00;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Empty input, or the input is not a 4 element COSE_Sign1 array.
    #[error("Bad parameters, or not a COSE_Sign1 manifest")]
    BadParameters,

    #[error("Encoded signature length {0} is too long")]
    EncodedSignatureLengthTooLong(usize),

    #[error("Unsupported signature algorithm {0}")]
    InvalidSignatureAlgorithm(i32),

    #[error("Trust anchor {0:#06x} is not permitted")]
    InvalidTrustAnchor(u16),

    #[error("Unsupported manifest version {0}")]
    UnsupportedManifestVersion(u32),

    #[error("Encoded digest length {0} is too long")]
    EncodedDigestLengthTooLong(usize),

    #[error("Invalid digest algorithm {0}")]
    InvalidDigestAlgorithm(u32),

    #[error("Target OID {0:#06x} is not updatable")]
    InvalidTargetOid(u16),

    /// The signature does not end exactly at the end of the input.
    #[error("Signature length {actual} does not match the {expected} bytes remaining")]
    LengthsDontMatch { expected: usize, actual: usize },

    #[error("Manifest is truncated, {0} more bytes needed")]
    TruncatedInput(usize),

    #[error("Byte string of {length} bytes does not fit in a {capacity} byte field")]
    FieldTooLarge { length: usize, capacity: usize },

    #[error(transparent)]
    InvalidCbor(cbor::decode::Error),
}

impl Error {
    pub fn code(&self) -> u8 {
        match self {
            Self::BadParameters => 0x01,
            Self::EncodedSignatureLengthTooLong(_) => 0x03,
            Self::InvalidSignatureAlgorithm(_) => 0x04,
            Self::InvalidTrustAnchor(_) => 0x05,
            Self::UnsupportedManifestVersion(_) => 0x06,
            Self::EncodedDigestLengthTooLong(_) => 0x07,
            Self::InvalidDigestAlgorithm(_) => 0x08,
            Self::InvalidTargetOid(_) => 0x09,
            Self::LengthsDontMatch { .. } => 0x0a,
            Self::TruncatedInput(_) => 0x0b,
            Self::FieldTooLarge { .. } => 0x0c,
            Self::InvalidCbor(_) => 0x0d,
        }
    }
}

impl From<cbor::decode::Error> for Error {
    fn from(value: cbor::decode::Error) -> Self {
        match value {
            cbor::decode::Error::NeedMoreData(n) => Self::TruncatedInput(n),
            cbor::decode::Error::FieldTooLarge { length, capacity } => {
                Self::FieldTooLarge { length, capacity }
            }
            e => Self::InvalidCbor(e),
        }
    }
}
