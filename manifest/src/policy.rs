use core::ops::RangeInclusive;

pub const MANIFEST_VERSION: u32 = 1;

/// Certificate slots permitted to authorise an update.
pub const TRUST_ANCHORS: [u16; 7] = [0xE0E8, 0xE0E9, 0xE0EF, 0xE0E0, 0xE0E1, 0xE0E2, 0xE0E3];

pub const LEAST_UPDATABLE_TARGET_OID: u16 = 0xE0C0;
pub const LAST_UPDATABLE_TARGET_OID: u16 = 0xF1E1;

pub const MAXIMUM_DIGEST_LENGTH: usize = 0x20;
pub const MAXIMUM_SIGNATURE_LENGTH: usize = 0x100;

/// The limits a manifest is checked against while it is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy<'p> {
    pub trust_anchors: &'p [u16],
    pub target_oids: RangeInclusive<u16>,
    pub max_digest_length: usize,
    pub max_signature_length: usize,
    pub manifest_version: u32,
    /// Reject signature and digest algorithms missing from the name tables.
    pub require_known_algorithms: bool,
}

impl Policy<'static> {
    pub const DEFAULT: Self = Self {
        trust_anchors: &TRUST_ANCHORS,
        target_oids: LEAST_UPDATABLE_TARGET_OID..=LAST_UPDATABLE_TARGET_OID,
        max_digest_length: MAXIMUM_DIGEST_LENGTH,
        max_signature_length: MAXIMUM_SIGNATURE_LENGTH,
        manifest_version: MANIFEST_VERSION,
        require_known_algorithms: false,
    };
}

impl Default for Policy<'static> {
    fn default() -> Self {
        Self::DEFAULT
    }
}
