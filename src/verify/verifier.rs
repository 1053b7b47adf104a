use std::io::Write;

use anyhow::Result;

use crate::core::Outcome;
use crate::matcher::FingerprintDb;

use super::reporter::Reporter;

/// Drives one database file through the reporter: path header, every
/// fingerprint's examples in declaration order, then the file summary.
pub struct Verifier<'v, 'r, W: Write> {
    db: &'v FingerprintDb,
    reporter: &'v mut Reporter<'r, W>,
}

impl<'v, 'r, W: Write> Verifier<'v, 'r, W> {
    pub fn new(db: &'v FingerprintDb, reporter: &'v mut Reporter<'r, W>) -> Self {
        Self { db, reporter }
    }

    /// Verify the whole file. Outcome messages pick up their WARN/FAIL
    /// prefix here, on their way from the engine to the reporter. The
    /// reporter is borrowed rather than consumed, so the caller can
    /// read the file's counts off it afterwards.
    pub fn verify(self) -> Result<()> {
        let Verifier { db, reporter } = self;
        reporter.print_path()?;

        for fingerprint in db.iter() {
            reporter.print_name(fingerprint)?;

            // The engine's visitor cannot return early, so the first
            // sink error is parked and re-raised after the fingerprint
            // finishes.
            let mut sink_error: Option<anyhow::Error> = None;
            fingerprint.verify_examples(|outcome, message| {
                if sink_error.is_some() {
                    return;
                }
                let result = match outcome {
                    Outcome::Success => reporter.success(&message),
                    Outcome::Warn => reporter.warning(&format!("WARN: {message}")),
                    Outcome::Fail => reporter.failure(&format!("FAIL: {message}")),
                };
                if let Err(err) = result {
                    sink_error = Some(err);
                }
            });
            if let Some(err) = sink_error {
                return Err(err);
            }
        }

        reporter.report(db.len())
    }
}
