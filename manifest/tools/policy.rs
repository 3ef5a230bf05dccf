/*!
Validation policy loading.

The policy starts from the built-in defaults, is overlaid by an optional TOML
file, and finally by `OPTIGA_MANIFEST_*` environment variables, e.g.

```toml
trust_anchors = [0xE0E8, 0xE0E9]
least_target_oid = 0xE0F1
last_target_oid = 0xE0F1
require_known_algorithms = true
```

`OPTIGA_MANIFEST_TRUST_ANCHORS` takes a single anchor or a comma separated
list, each either decimal or `0x` prefixed hex. The other numeric variables
are decimal only.
*/

use clap::Args;
use optiga_manifest::Policy;
use serde::{
    Deserialize, Deserializer,
    de::{self, Visitor},
};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// TOML file overriding the default validation policy
    #[arg(long, value_name = "FILE")]
    policy: Option<PathBuf>,
}

impl PolicyArgs {
    pub fn load(&self) -> anyhow::Result<PolicyConfig> {
        PolicyConfig::load(self.policy.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    #[serde(deserialize_with = "trust_anchors")]
    pub trust_anchors: Vec<u16>,
    pub least_target_oid: u16,
    pub last_target_oid: u16,
    pub max_digest_length: usize,
    pub max_signature_length: usize,
    pub manifest_version: u32,
    pub require_known_algorithms: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            trust_anchors: optiga_manifest::TRUST_ANCHORS.to_vec(),
            least_target_oid: optiga_manifest::LEAST_UPDATABLE_TARGET_OID,
            last_target_oid: optiga_manifest::LAST_UPDATABLE_TARGET_OID,
            max_digest_length: optiga_manifest::MAXIMUM_DIGEST_LENGTH,
            max_signature_length: optiga_manifest::MAXIMUM_SIGNATURE_LENGTH,
            manifest_version: optiga_manifest::MANIFEST_VERSION,
            require_known_algorithms: false,
        }
    }
}

/// An object identifier written as an integer, or as a decimal or `0x` hex string.
struct Oid(u16);

impl<'de> Deserialize<'de> for Oid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OidVisitor)
    }
}

struct OidVisitor;

impl Visitor<'_> for OidVisitor {
    type Value = Oid;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a 16-bit object identifier")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .map(Oid)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .map(Oid)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let v = v.trim();
        let oid = match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => v.parse(),
        };
        oid.map(Oid)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// Accepts either one anchor or a list of them.
///
/// A lone environment value is parsed as a scalar before list splitting happens,
/// so both shapes have to be handled here.
fn trust_anchors<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u16>, D::Error> {
    struct AnchorsVisitor;

    impl<'de> Visitor<'de> for AnchorsVisitor {
        type Value = Vec<u16>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a trust anchor OID or a list of them")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            OidVisitor.visit_u64(v).map(|oid| vec![oid.0])
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            OidVisitor.visit_i64(v).map(|oid| vec![oid.0])
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            OidVisitor.visit_str(v).map(|oid| vec![oid.0])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut anchors = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(Oid(oid)) = seq.next_element()? {
                anchors.push(oid);
            }
            Ok(anchors)
        }
    }

    deserializer.deserialize_any(AnchorsVisitor)
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn environment() -> config::Environment {
    config::Environment::with_prefix("OPTIGA_MANIFEST")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("trust_anchors")
}

impl PolicyConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut b = config::Config::builder();
        if let Some(path) = path {
            info!("Using policy file '{}'", path.display());
            b = b.add_source(config::File::from(path).format(config::FileFormat::Toml));
        }
        Self::build(b, environment())
    }

    fn build(b: Builder, env: config::Environment) -> anyhow::Result<Self> {
        let config = b
            .add_source(env)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load policy: {e}"))?;

        let policy: Self = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid policy: {e}"))?;

        if policy.least_target_oid > policy.last_target_oid {
            return Err(anyhow::anyhow!(
                "Invalid policy: least_target_oid {:#06x} is above last_target_oid {:#06x}",
                policy.least_target_oid,
                policy.last_target_oid
            ));
        }
        if policy.trust_anchors.is_empty() {
            warn!("Policy has no trust anchors, every manifest will be rejected");
        }
        Ok(policy)
    }

    pub fn policy(&self) -> Policy<'_> {
        Policy {
            trust_anchors: &self.trust_anchors,
            target_oids: self.least_target_oid..=self.last_target_oid,
            max_digest_length: self.max_digest_length,
            max_signature_length: self.max_signature_length,
            manifest_version: self.manifest_version,
            require_known_algorithms: self.require_known_algorithms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(s: &str) -> anyhow::Result<PolicyConfig> {
        PolicyConfig::build(
            config::Config::builder().add_source(config::File::from_str(s, config::FileFormat::Toml)),
            environment().source(Some(config::Map::new())),
        )
    }

    fn from_env(vars: &[(&str, &str)]) -> anyhow::Result<PolicyConfig> {
        PolicyConfig::build(
            config::Config::builder(),
            environment().source(Some(
                vars.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )),
        )
    }

    #[test]
    fn defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(PolicyConfig::default(), config);
        assert_eq!(Policy::DEFAULT, config.policy());
    }

    #[test]
    fn overrides() {
        let config = from_toml(
            r#"
            trust_anchors = [0xE0E8, 0xE0E9]
            least_target_oid = 0xE0F1
            last_target_oid = 0xE0F1
            require_known_algorithms = true
            "#,
        )
        .unwrap();

        let policy = config.policy();
        assert_eq!(&[0xE0E8u16, 0xE0E9], policy.trust_anchors);
        assert_eq!(0xE0F1..=0xE0F1, policy.target_oids);
        assert_eq!(optiga_manifest::MAXIMUM_DIGEST_LENGTH, policy.max_digest_length);
        assert!(policy.require_known_algorithms);
    }

    #[test]
    fn env_single_anchor() {
        let config = from_env(&[("OPTIGA_MANIFEST_TRUST_ANCHORS", "57577")]).unwrap();
        assert_eq!(vec![0xE0E9u16], config.trust_anchors);
    }

    #[test]
    fn env_anchor_list() {
        let config = from_env(&[("OPTIGA_MANIFEST_TRUST_ANCHORS", "57576,0xE0E1")]).unwrap();
        assert_eq!(vec![0xE0E8u16, 0xE0E1], config.trust_anchors);
    }

    #[test]
    fn env_hex_anchor() {
        let config = from_env(&[("OPTIGA_MANIFEST_TRUST_ANCHORS", "0xE0EF")]).unwrap();
        assert_eq!(vec![0xE0EFu16], config.trust_anchors);
    }

    #[test]
    fn env_overrides_scalars() {
        let config = from_env(&[
            ("OPTIGA_MANIFEST_LAST_TARGET_OID", "57568"),
            ("OPTIGA_MANIFEST_REQUIRE_KNOWN_ALGORITHMS", "true"),
        ])
        .unwrap();
        assert_eq!(0xE0E0, config.last_target_oid);
        assert!(config.require_known_algorithms);
        assert_eq!(optiga_manifest::TRUST_ANCHORS.to_vec(), config.trust_anchors);
    }

    #[test]
    fn bad_anchors() {
        assert!(from_env(&[("OPTIGA_MANIFEST_TRUST_ANCHORS", "65536")]).is_err());
        assert!(from_env(&[("OPTIGA_MANIFEST_TRUST_ANCHORS", "0xE0E8,anchor")]).is_err());
        assert!(from_toml("trust_anchors = [-1]").is_err());
    }

    #[test]
    fn inverted_target_range() {
        assert!(from_toml("least_target_oid = 0xF000\nlast_target_oid = 0xE000").is_err());
    }
}
