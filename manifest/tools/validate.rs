use super::*;
use optiga_manifest::Manifest;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
pub struct Command {
    #[command(flatten)]
    policy_args: policy::PolicyArgs,

    /// The list of manifest files to validate, '-' to use stdin.
    files: Vec<io::Input>,
}

pub fn exec(args: Command) -> anyhow::Result<()> {
    if args.files.is_empty() {
        return Err(anyhow::anyhow!("No files to validate"));
    }

    let config = args.policy_args.load()?;
    let policy = config.policy();

    let mut count_failed: usize = 0;
    for input in args.files {
        let data = input.read()?;

        match Manifest::parse_with_policy(&data, &policy) {
            Err(e) => {
                eprintln!(
                    "{}: Manifest rejected (code {:#04x}): {e}",
                    input,
                    e.code()
                );
                count_failed = count_failed.saturating_add(1);
            }
            Ok(manifest) => info!(
                "{}: Valid manifest for OID {:#06X}, trust anchor {:#06X}",
                input,
                manifest.target_oid,
                manifest.trust_anchor_oid
            ),
        }
    }

    (count_failed == 0)
        .then_some(())
        .ok_or(anyhow::anyhow!("{count_failed} files failed to validate"))
}
