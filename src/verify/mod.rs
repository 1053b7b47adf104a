//! The verification pipeline: line formatting, mode-aware reporting,
//! per-file verification, and the run loop tying them to parsed
//! databases.

mod formatter;
mod reporter;
mod verifier;

pub use formatter::{Formatter, SummaryClass};
pub use reporter::{FileCounts, Reporter};
pub use verifier::Verifier;

use std::io::Write;
use std::path::Path;

use crate::core::{FormatMode, RunCounters, VerifierOptions};
use crate::errors::RunError;
use crate::io::PatternWalker;
use crate::parser;

/// Expand `patterns` under `base`, verify every matched database in
/// order, and return the run's problem counters. The first fatal
/// condition (bad pattern, walk error, pattern with no matches, parse
/// failure, sink write failure) aborts the run; output produced before
/// the abort stays in the sink.
pub fn verify_all<W: Write>(
    base: &Path,
    patterns: &[String],
    options: &VerifierOptions,
    out: W,
) -> Result<RunCounters, RunError> {
    let files = PatternWalker::new(base).expand(patterns)?;
    log::info!("verifying {} database files", files.len());

    let mut totals = RunCounters::new();
    let mut formatter = Formatter::new(options.clone(), out);

    for (index, relative) in files.iter().enumerate() {
        let mut db = parser::parse_file(&base.join(relative)).map_err(|source| {
            RunError::Parse {
                path: relative.clone(),
                source,
            }
        })?;
        // Reports refer to files the way the pattern found them, not
        // by the joined read path.
        db.path = relative.clone();

        if index > 0 && options.format != FormatMode::Quiet {
            // Quiet lines carry their own path context; the block
            // modes get a separator between files.
            formatter.blank()?;
        }

        let mut reporter = Reporter::new(
            options.clone(),
            &mut formatter,
            db.path.display().to_string(),
            &mut totals,
        );
        Verifier::new(&db, &mut reporter).verify()?;
        log::debug!(
            "{}: {} failures, {} warnings",
            db.path.display(),
            reporter.failure_count(),
            reporter.warning_count()
        );
    }

    log::debug!(
        "run complete: {} failures, {} warnings",
        totals.failures,
        totals.warnings
    );
    Ok(totals)
}
