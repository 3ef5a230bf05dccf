/*!
Manifest Tools - a CLI for OPTIGA protected-update manifests

# Commands

- `inspect`: Decode a manifest and display its fields (markdown or JSON)
- `validate`: Check one or more manifests, reporting any that are rejected

# Examples

```bash
# Show the fields of a manifest
manifest inspect update.manifest

# As JSON, checked against a site policy
manifest inspect --format json --policy policy.toml update.manifest

# Check a batch of manifests, with decoder tracing
manifest --log-level trace validate *.manifest
```
*/

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod inspect;
mod io;
mod policy;
mod validate;

/// A CLI tool for inspecting and validating protected-update manifests.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maximum log level: off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a manifest and display its fields
    Inspect(inspect::Command),

    /// Check one or more manifests for validity
    Validate(validate::Command),
}

fn init_logger(log_level: LevelFilter) {
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(log_level > LevelFilter::from_level(tracing::Level::INFO))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Validate(args) => validate::exec(args),
    }
}
