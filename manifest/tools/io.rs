use std::{fmt, io::Read, path::PathBuf};

/// Where a manifest is read from: a file, or stdin when given as `-`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    StdIn,
    Path(PathBuf),
}

impl Input {
    /// Reads the whole manifest into memory.
    pub fn read(&self) -> anyhow::Result<Vec<u8>> {
        let data = match self {
            Self::StdIn => {
                let mut data = Vec::new();
                std::io::stdin().lock().read_to_end(&mut data).map(|_| data)
            }
            Self::Path(path) => std::fs::read(path),
        };
        data.map_err(|e| anyhow::anyhow!("Failed to read manifest from {self}: {e}"))
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StdIn => f.write_str("stdin"),
            Self::Path(path) => write!(f, "'{}'", path.display()),
        }
    }
}

impl std::str::FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Self::StdIn,
            path => Self::Path(path.into()),
        })
    }
}

/// Where a report is written: a file, or stdout when empty or `-`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output(Option<PathBuf>);

impl Output {
    pub fn write(&self, report: &str) -> anyhow::Result<()> {
        match &self.0 {
            Some(path) => std::fs::write(path, report).map_err(|e| {
                anyhow::anyhow!("Failed to write report to '{}': {e}", path.display())
            }),
            None => {
                use std::io::Write;
                std::io::stdout()
                    .lock()
                    .write_all(report.as_bytes())
                    .map_err(|e| anyhow::anyhow!("Failed to write report to stdout: {e}"))
            }
        }
    }
}

impl std::str::FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self((!s.is_empty() && s != "-").then(|| s.into())))
    }
}
