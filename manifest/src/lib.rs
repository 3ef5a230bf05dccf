/*!
A validating decoder for OPTIGA protected-update manifests.

A manifest is a CBOR encoded COSE_Sign1 structure naming the trust anchor
that must verify it, the protected object to update, the digest of the
update payload and the signature over it. [`Manifest::parse`] decodes and
checks every field in a single pass over the input, without copying or
allocating: the digest, signature and raw manifest are borrowed from the
input buffer and live exactly as long as it does.

No cryptographic verification is performed here. A successfully parsed
manifest is well-formed and within [`Policy`], nothing more.

```
use optiga_manifest::{Error, Manifest};

assert_eq!(Manifest::parse(&[0x83]), Err(Error::BadParameters));
```
*/
#![no_std]

#[cfg(test)]
extern crate std;

use optiga_cbor as cbor;
use tracing::{debug, trace};

mod algorithm;
mod error;
mod parse;
mod policy;



pub use algorithm::{
    DigestAlgorithm, INVALID_NAME, SignatureAlgorithm, name_for_digest, name_for_signature,
};
pub use error::{Error, OK};
pub use policy::{
    LAST_UPDATABLE_TARGET_OID, LEAST_UPDATABLE_TARGET_OID, MANIFEST_VERSION,
    MAXIMUM_DIGEST_LENGTH, MAXIMUM_SIGNATURE_LENGTH, Policy, TRUST_ANCHORS,
};

/// A decoded and validated protected-update manifest.
///
/// `Manifest::default()` is the empty record: every integer zero, every
/// slice empty and both algorithms `Invalid`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Manifest<'a> {
    pub version: u32,
    pub payload_version: u32,
    pub payload_length: u32,
    /// The certificate slot that must verify [`Manifest::signature`].
    pub trust_anchor_oid: u16,
    /// The protected object the payload is written to.
    pub target_oid: u16,
    pub offset_in_oid: u32,
    pub write_type: u32,
    pub signature_algorithm: SignatureAlgorithm,
    pub signature: &'a [u8],
    pub digest_algorithm: DigestAlgorithm,
    pub digest: &'a [u8],
    /// The complete encoded manifest.
    pub raw: &'a [u8],
}

impl<'a> Manifest<'a> {
    /// Decodes `data` against [`Policy::DEFAULT`].
    pub fn parse(data: &'a [u8]) -> Result<Self, Error> {
        Self::parse_with_policy(data, &Policy::DEFAULT)
    }

    #[cfg_attr(feature = "instrument", tracing::instrument(skip_all))]
    pub fn parse_with_policy(data: &'a [u8], policy: &Policy<'_>) -> Result<Self, Error> {
        parse::parse(data, policy)
    }
}

/// Decodes `data` into a caller-owned record.
///
/// On failure `manifest` is reset to `Manifest::default()`, so nothing from a
/// rejected manifest survives in it.
pub fn parse_manifest<'a>(data: &'a [u8], manifest: &mut Manifest<'a>) -> Result<(), Error> {
    match Manifest::parse(data) {
        Ok(m) => {
            *manifest = m;
            Ok(())
        }
        Err(e) => {
            *manifest = Manifest::default();
            Err(e)
        }
    }
}
