//! CLI argument parsing using Clap.

use std::path::PathBuf;

use clap::Parser;

/// Workbook structural validator
#[derive(Parser, Debug)]
#[command(name = "workbook-validate")]
#[command(version, about, long_about = None)]
#[command(after_help = "Examples:
  workbook-validate                                Validate ./workbook.json against ./README.md
  workbook-validate --workbook dash.workbook.json  Validate a specific workbook file
  workbook-validate --out-dir artifacts            Write the XML report elsewhere
")]
pub struct Cli {
    /// Path to the workbook JSON document
    #[arg(long, env = "WORKBOOK_PATH", default_value = "workbook.json")]
    pub workbook: PathBuf,

    /// Path to the changelog document carrying the version headings
    #[arg(long, env = "WORKBOOK_CHANGELOG", default_value = "README.md")]
    pub changelog: PathBuf,

    /// Directory the XML report is written to (created if absent)
    #[arg(long, default_value = "test-results")]
    pub out_dir: PathBuf,

    /// Suppress per-assertion progress lines (summary and failures still print)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn defaults_point_at_conventional_paths() {
        let cli = Cli::parse_from(["workbook-validate"]);
        assert_eq!(cli.workbook, Path::new("workbook.json"));
        assert_eq!(cli.changelog, Path::new("README.md"));
        assert_eq!(cli.out_dir, Path::new("test-results"));
        assert!(!cli.quiet);
    }

    #[test]
    fn explicit_paths_override_defaults() {
        let cli = Cli::parse_from([
            "workbook-validate",
            "--workbook",
            "dash.workbook.json",
            "--changelog",
            "CHANGELOG.md",
            "--out-dir",
            "artifacts",
            "-q",
        ]);
        assert_eq!(cli.workbook, Path::new("dash.workbook.json"));
        assert_eq!(cli.changelog, Path::new("CHANGELOG.md"));
        assert_eq!(cli.out_dir, Path::new("artifacts"));
        assert!(cli.quiet);
    }
}
