use super::*;
use cbor::decode::{Cursor, Destination};

/// A COSE_Sign1 structure is a 4 element array.
const COSE_SIGN1_LENGTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    SignatureAlgorithm,
    TrustAnchor,
    Version,
    PayloadLength,
    PayloadVersion,
    OffsetInOid,
    WriteType,
    DigestAlgorithm,
    Digest,
    TargetOid,
    Signature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The outer COSE_Sign1 array header
    Envelope,
    /// A byte string header; its content is walked as nested items
    Wrapper,
    /// An array header; the count is not checked
    Array,
    /// A negative integer with no modelled meaning
    SkipSigned,
    /// Raw bytes with no modelled meaning
    Reserved(usize),
    Field(Field),
}

/// The manifest grammar, in wire order.
const LAYOUT: &[(&str, Step)] = &[
    ("COSE_Sign1", Step::Envelope),
    ("protected header", Step::Wrapper),
    ("signature algorithm", Step::Field(Field::SignatureAlgorithm)),
    ("trust anchor", Step::Field(Field::TrustAnchor)),
    ("payload", Step::Wrapper),
    ("trust manifest", Step::Array),
    ("manifest version", Step::Field(Field::Version)),
    ("reserved", Step::Reserved(2)),
    ("payload info", Step::Array),
    ("payload type", Step::SkipSigned),
    ("payload length", Step::Field(Field::PayloadLength)),
    ("payload version", Step::Field(Field::PayloadVersion)),
    ("write options", Step::Array),
    ("offset in oid", Step::Field(Field::OffsetInOid)),
    ("write type", Step::Field(Field::WriteType)),
    ("processors", Step::Array),
    ("processing step", Step::Array),
    ("processing step type", Step::SkipSigned),
    ("digest section", Step::Wrapper),
    ("digest", Step::Array),
    ("digest algorithm", Step::Field(Field::DigestAlgorithm)),
    ("digest value", Step::Field(Field::Digest)),
    ("reserved", Step::Reserved(1)),
    ("target", Step::Array),
    ("target section", Step::Wrapper),
    ("target oid wrapper", Step::Wrapper),
    ("target oid", Step::Field(Field::TargetOid)),
    ("signature", Step::Field(Field::Signature)),
];

pub(super) fn parse<'a>(data: &'a [u8], policy: &Policy<'_>) -> Result<Manifest<'a>, Error> {
    if data.is_empty() {
        return Err(Error::BadParameters);
    }

    let mut manifest = Manifest {
        raw: data,
        ..Default::default()
    };
    let mut cursor = Cursor::new(data);
    for (name, step) in LAYOUT {
        trace!("Reading {name} at offset {}", cursor.offset());

        step.read(&mut cursor, &mut manifest, policy)
            .inspect_err(|e| {
                debug!("Manifest rejected at {name}, offset {}: {e}", cursor.offset())
            })?;
    }
    Ok(manifest)
}

impl Step {
    fn read<'a>(
        self,
        cursor: &mut Cursor<'a>,
        manifest: &mut Manifest<'a>,
        policy: &Policy<'_>,
    ) -> Result<(), Error> {
        match self {
            Self::Envelope => {
                if cursor.read_array_count().ok() != Some(COSE_SIGN1_LENGTH) {
                    return Err(Error::BadParameters);
                }
            }
            Self::Wrapper => {
                cursor.read_byte_string_length()?;
            }
            Self::Array => {
                cursor.read_array_count()?;
            }
            Self::SkipSigned => {
                cursor.read_signed()?;
            }
            Self::Reserved(len) => cursor.skip(len)?,
            Self::Field(field) => field.read(cursor, manifest, policy)?,
        }
        Ok(())
    }
}

impl Field {
    fn read<'a>(
        self,
        cursor: &mut Cursor<'a>,
        manifest: &mut Manifest<'a>,
        policy: &Policy<'_>,
    ) -> Result<(), Error> {
        match self {
            Self::SignatureAlgorithm => {
                let mut code = 0;
                cursor.read_mapped_entry(Destination::Signed(Some(&mut code)))?;
                manifest.signature_algorithm = code.into();
                if policy.require_known_algorithms && !manifest.signature_algorithm.is_known() {
                    return Err(Error::InvalidSignatureAlgorithm(code));
                }
            }
            Self::TrustAnchor => {
                // Arrives in reverse byte order, i.e. little-endian
                let mut oid = [0u8; 2];
                cursor.read_mapped_entry(Destination::Bytes(Some(&mut oid)))?;
                manifest.trust_anchor_oid = u16::from_le_bytes(oid);
                if !policy.trust_anchors.contains(&manifest.trust_anchor_oid) {
                    return Err(Error::InvalidTrustAnchor(manifest.trust_anchor_oid));
                }
            }
            Self::Version => {
                manifest.version = cursor.read_unsigned()?;
                if manifest.version != policy.manifest_version {
                    return Err(Error::UnsupportedManifestVersion(manifest.version));
                }
            }
            Self::PayloadLength => manifest.payload_length = cursor.read_unsigned()?,
            Self::PayloadVersion => manifest.payload_version = cursor.read_unsigned()?,
            Self::OffsetInOid => manifest.offset_in_oid = cursor.read_unsigned()?,
            Self::WriteType => manifest.write_type = cursor.read_unsigned()?,
            Self::DigestAlgorithm => {
                let code = cursor.read_unsigned()?;
                manifest.digest_algorithm = code.into();
                match manifest.digest_algorithm {
                    DigestAlgorithm::Invalid => return Err(Error::InvalidDigestAlgorithm(code)),
                    DigestAlgorithm::Unrecognised(_) if policy.require_known_algorithms => {
                        return Err(Error::InvalidDigestAlgorithm(code));
                    }
                    _ => {}
                }
            }
            Self::Digest => {
                let len = cursor.read_byte_string_length()?;
                if len > policy.max_digest_length {
                    return Err(Error::EncodedDigestLengthTooLong(len));
                }
                manifest.digest = cursor.take(len)?;
            }
            Self::TargetOid => {
                manifest.target_oid = cursor.read_be_u16()?;
                if !policy.target_oids.contains(&manifest.target_oid) {
                    return Err(Error::InvalidTargetOid(manifest.target_oid));
                }
            }
            Self::Signature => {
                let len = cursor.read_byte_string_length()?;
                if len > policy.max_signature_length {
                    return Err(Error::EncodedSignatureLengthTooLong(len));
                }

                // The signature must be the last thing in the buffer
                let remaining = cursor.remaining();
                if len != remaining {
                    return Err(Error::LengthsDontMatch {
                        expected: remaining,
                        actual: len,
                    });
                }
                manifest.signature = cursor.take(len)?;
            }
        }
        Ok(())
    }
}
