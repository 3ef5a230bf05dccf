use super::*;
use optiga_manifest::Manifest;
use serde::Serialize;
use std::fmt::Write;

#[derive(Parser, Debug)]
#[command(
    about = "Decode a manifest and display its fields",
    long_about = "Decode a manifest and display its fields.\n\n\
        The manifest is validated against the policy before anything is shown; \
        a rejected manifest is reported with its error code.\n\n\
        Output formats:\n\
        - markdown: Human-readable format (default)\n\
        - json: Machine-readable JSON\n\
        - json-pretty: Pretty-printed JSON"
)]
pub struct Command {
    #[command(flatten)]
    policy_args: policy::PolicyArgs,

    /// Output format
    #[arg(
        long,
        default_value = "markdown",
        value_name = "FORMAT",
        help = "Output format: markdown (human-readable), json, json-pretty"
    )]
    format: OutputFormat,

    /// Path to the location to write the output to, or stdout if not supplied
    #[arg(short, long, required = false, default_value = "")]
    output: io::Output,

    /// The manifest file to inspect, '-' to use stdin.
    input: io::Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable markdown format
    Markdown,
    /// Machine-readable JSON format
    Json,
    /// Pretty-printed JSON format
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Serialize)]
struct Algorithm {
    code: i64,
    name: &'static str,
}

/// The JSON view of a manifest.
#[derive(Serialize)]
struct Report {
    version: u32,
    trust_anchor_oid: String,
    target_oid: String,
    offset_in_oid: u32,
    write_type: u32,
    payload_length: u32,
    payload_version: u32,
    signature_algorithm: Algorithm,
    signature: String,
    digest_algorithm: Algorithm,
    digest: String,
    manifest_length: usize,
}

impl From<&Manifest<'_>> for Report {
    fn from(m: &Manifest<'_>) -> Self {
        Self {
            version: m.version,
            trust_anchor_oid: format!("{:#06X}", m.trust_anchor_oid),
            target_oid: format!("{:#06X}", m.target_oid),
            offset_in_oid: m.offset_in_oid,
            write_type: m.write_type,
            payload_length: m.payload_length,
            payload_version: m.payload_version,
            signature_algorithm: Algorithm {
                code: i32::from(m.signature_algorithm).into(),
                name: m.signature_algorithm.name(),
            },
            signature: hex::encode(m.signature),
            digest_algorithm: Algorithm {
                code: u32::from(m.digest_algorithm).into(),
                name: m.digest_algorithm.name(),
            },
            digest: hex::encode(m.digest),
            manifest_length: m.raw.len(),
        }
    }
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let config = self.policy_args.load()?;
        let data = self.input.read()?;

        let manifest = Manifest::parse_with_policy(&data, &config.policy()).map_err(|e| {
            anyhow::anyhow!(
                "{}: Manifest rejected (code {:#04x}): {e}",
                self.input,
                e.code()
            )
        })?;

        let text = match self.format {
            OutputFormat::Markdown => markdown(&manifest),
            OutputFormat::Json => serde_json::to_string(&Report::from(&manifest))? + "\n",
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(&Report::from(&manifest))? + "\n"
            }
        };
        self.output.write(&text)
    }
}

fn markdown(m: &Manifest<'_>) -> String {
    let mut s = String::from("# Protected Update Manifest\n\n");

    // Writing to a String cannot fail
    _ = writeln!(s, "Manifest version: {}\n", m.version);
    _ = writeln!(s, "Trust anchor: {:#06X}\n", m.trust_anchor_oid);
    _ = writeln!(s, "## Payload\n");
    _ = writeln!(s, "Target OID: {:#06X}\n", m.target_oid);
    _ = writeln!(s, "Offset in OID: {}\n", m.offset_in_oid);
    _ = writeln!(s, "Write type: {}\n", m.write_type);
    _ = writeln!(s, "Length: {} bytes\n", m.payload_length);
    _ = writeln!(s, "Version: {}\n", m.payload_version);
    _ = writeln!(s, "## Digest\n");
    _ = writeln!(
        s,
        "Algorithm: {} ({})\n",
        m.digest_algorithm,
        u32::from(m.digest_algorithm)
    );
    _ = writeln!(s, "Value ({} bytes): {}\n", m.digest.len(), hex::encode(m.digest));
    _ = writeln!(s, "## Signature\n");
    _ = writeln!(
        s,
        "Algorithm: {} ({})\n",
        m.signature_algorithm,
        i32::from(m.signature_algorithm)
    );
    _ = writeln!(
        s,
        "Value ({} bytes): {}",
        m.signature.len(),
        hex::encode(m.signature)
    );
    s
}
