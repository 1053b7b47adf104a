use std::io;
use std::path::Path;
use std::process;

use fpverify::cli::Cli;
use fpverify::errors::RunError;
use fpverify::verify;

fn main() {
    env_logger::init();

    let cli = Cli::parse_or_exit();
    if cli.color {
        // Styling is requested explicitly, so apply it even when
        // stdout is piped. Never forced off: the formatter already
        // leaves lines plain without the flag.
        colored::control::set_override(true);
    }

    let options = cli.verifier_options();
    let stdout = io::stdout();
    let result = verify::verify_all(Path::new("."), &cli.patterns, &options, stdout.lock());

    let code = match result {
        Ok(totals) => totals.exit_code(),
        Err(err @ RunError::NoMatches { .. }) => {
            eprintln!("error: {err}");
            eprintln!("{}", Cli::usage());
            1
        }
        Err(err) => {
            eprintln!("error: {err}");
            255
        }
    };
    process::exit(code);
}
