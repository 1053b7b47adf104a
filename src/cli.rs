use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::core::{FormatMode, VerifierOptions};

#[derive(Parser, Debug)]
#[command(name = "fpverify")]
#[command(about = "Verifies fingerprint databases against their embedded examples", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Glob patterns selecting the database files to verify
    #[arg(required = true, value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Output format: 's'ummary (problems plus per-file summaries),
    /// 'q'uiet (problem lines only), or 'd'etail (everything)
    #[arg(
        short,
        long,
        value_name = "FORMATTER",
        default_value = "summary",
        value_parser = parse_format
    )]
    pub format: FormatMode,

    /// Color the report lines by severity
    #[arg(short, long)]
    pub color: bool,

    /// Track warnings, counting them toward the exit status (default)
    #[arg(long, conflicts_with = "no_warnings")]
    pub warnings: bool,

    /// Ignore warnings: show them only in detail output, count them
    /// nowhere
    #[arg(long)]
    pub no_warnings: bool,
}

fn parse_format(arg: &str) -> Result<FormatMode, String> {
    Ok(FormatMode::from_arg(arg))
}

impl Cli {
    /// Run configuration selected by the parsed flags.
    pub fn verifier_options(&self) -> VerifierOptions {
        VerifierOptions {
            format: self.format,
            color: self.color,
            warnings: !self.no_warnings,
        }
    }

    /// Parse the process arguments, mapping clap's outcomes onto the
    /// exit contract: `--version` exits clean, help and a missing
    /// pattern are usage errors, anything else is a command-line
    /// error.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) => {
                let code = match err.kind() {
                    ErrorKind::DisplayVersion => 0,
                    ErrorKind::DisplayHelp | ErrorKind::MissingRequiredArgument => 1,
                    _ => 2,
                };
                let _ = err.print();
                std::process::exit(code);
            }
        }
    }

    /// One-line usage string for driver-level usage errors.
    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }
}
