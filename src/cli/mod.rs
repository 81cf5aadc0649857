//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod output;
pub mod prompt;

use output::OutputMode;

/// Create a repository in a GitHub organization and push the current directory to it.
#[derive(Parser, Debug)]
#[command(name = "orgpush", version, about, long_about = None)]
pub struct Cli {
    /// Organization that will own the repository (prompted when omitted)
    #[arg(long, value_name = "ORG")]
    pub org: Option<String>,

    /// Name of the repository to create (prompted when omitted)
    #[arg(long, value_name = "NAME")]
    pub repo: Option<String>,

    /// Directory to publish instead of the current one
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Create the repository as private
    #[arg(long)]
    pub private: bool,

    /// Explicit configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Machine-readable JSON output on stdout
    #[arg(long)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    #[must_use]
    pub const fn output_mode(&self) -> OutputMode {
        if self.robot {
            OutputMode::Robot
        } else {
            OutputMode::Human
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "orgpush",
            "--org",
            "acme",
            "--repo",
            "widgets",
            "--dir",
            "/tmp/site",
            "--private",
            "--robot",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.org.as_deref(), Some("acme"));
        assert_eq!(cli.repo.as_deref(), Some("widgets"));
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/site")));
        assert!(cli.private);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.output_mode(), OutputMode::Robot));
    }

    #[test]
    fn everything_is_optional() {
        let cli = Cli::try_parse_from(["orgpush"]).unwrap();
        assert!(cli.org.is_none());
        assert!(cli.repo.is_none());
        assert!(!cli.private);
        assert!(matches!(cli.output_mode(), OutputMode::Human));
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
