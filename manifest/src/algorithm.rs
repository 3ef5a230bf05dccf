/// The name reported for any code missing from the algorithm tables.
pub const INVALID_NAME: &str = "INVALID";

// When adding algorithms, check MAXIMUM_SIGNATURE_LENGTH still holds
static SIGNATURE_ALGORITHMS: &[(&str, i32)] = &[
    ("ES_SHA", ES_SHA),
    ("RSA_SSA_PKCS1_V1_5_SHA_256", RSA_SSA_PKCS1_V1_5_SHA_256),
];

// When adding algorithms, check MAXIMUM_DIGEST_LENGTH still holds
static DIGEST_ALGORITHMS: &[(&str, u32)] = &[("SHA256", SHA_256)];

const ES_SHA: i32 = -7;
const RSA_SSA_PKCS1_V1_5_SHA_256: i32 = -65700;
const SHA_256: u32 = 41;

fn lookup<T: PartialEq>(table: &[(&'static str, T)], code: T) -> &'static str {
    table
        .iter()
        .find(|(_, c)| *c == code)
        .map_or(INVALID_NAME, |(name, _)| *name)
}

pub fn name_for_signature(code: i32) -> &'static str {
    lookup(SIGNATURE_ALGORITHMS, code)
}

pub fn name_for_digest(code: u32) -> &'static str {
    lookup(DIGEST_ALGORITHMS, code)
}

/// COSE signature algorithm identifier carried in the protected header.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    #[default]
    Invalid,
    EsSha,
    RsaSsaPkcs1V15Sha256,
    Unrecognised(i32),
}

impl SignatureAlgorithm {
    pub fn name(&self) -> &'static str {
        name_for_signature((*self).into())
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Invalid | Self::Unrecognised(_))
    }
}

impl From<i32> for SignatureAlgorithm {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Invalid,
            ES_SHA => Self::EsSha,
            RSA_SSA_PKCS1_V1_5_SHA_256 => Self::RsaSsaPkcs1V15Sha256,
            v => Self::Unrecognised(v),
        }
    }
}

impl From<SignatureAlgorithm> for i32 {
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Invalid => 0,
            SignatureAlgorithm::EsSha => ES_SHA,
            SignatureAlgorithm::RsaSsaPkcs1V15Sha256 => RSA_SSA_PKCS1_V1_5_SHA_256,
            SignatureAlgorithm::Unrecognised(v) => v,
        }
    }
}

impl core::fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Hash algorithm used for the payload digest.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    #[default]
    Invalid,
    Sha256,
    Unrecognised(u32),
}

impl DigestAlgorithm {
    pub fn name(&self) -> &'static str {
        name_for_digest((*self).into())
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Invalid | Self::Unrecognised(_))
    }
}

impl From<u32> for DigestAlgorithm {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Invalid,
            SHA_256 => Self::Sha256,
            v => Self::Unrecognised(v),
        }
    }
}

impl From<DigestAlgorithm> for u32 {
    fn from(value: DigestAlgorithm) -> Self {
        match value {
            DigestAlgorithm::Invalid => 0,
            DigestAlgorithm::Sha256 => SHA_256,
            DigestAlgorithm::Unrecognised(v) => v,
        }
    }
}

impl core::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
