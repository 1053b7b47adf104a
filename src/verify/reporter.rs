//! Mode-aware emission and counting of verification results.
//!
//! A reporter covers exactly one database file. It decides which lines
//! the selected format shows, keeps the file's outcome tallies, and
//! folds them into the run-wide counters when the file's summary is
//! written. Run counters only ever grow; a fresh reporter starts each
//! file at zero.

use std::io::Write;

use anyhow::Result;

use crate::core::{FormatMode, RunCounters, VerifierOptions};
use crate::matcher::Fingerprint;

use super::formatter::{Formatter, SummaryClass};

/// Outcome tallies for one database file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileCounts {
    pub successes: usize,
    pub warnings: usize,
    pub failures: usize,
    /// Examples evaluated, including warnings that the tracking option
    /// keeps out of `warnings`.
    pub examples: usize,
}

impl FileCounts {
    /// Outcomes that entered the tallies.
    pub fn total(&self) -> usize {
        self.successes + self.warnings + self.failures
    }
}

pub struct Reporter<'r, W: Write> {
    options: VerifierOptions,
    formatter: &'r mut Formatter<W>,
    path: String,
    counts: FileCounts,
    totals: &'r mut RunCounters,
    /// Display name of the fingerprint currently being verified.
    current_name: String,
    /// Whether that name has reached the output yet. Compact modes
    /// hold it back until a non-success line needs the context.
    name_printed: bool,
}

impl<'r, W: Write> Reporter<'r, W> {
    pub fn new(
        options: VerifierOptions,
        formatter: &'r mut Formatter<W>,
        path: String,
        totals: &'r mut RunCounters,
    ) -> Self {
        Self {
            options,
            formatter,
            path,
            counts: FileCounts::default(),
            totals,
            current_name: String::new(),
            name_printed: false,
        }
    }

    /// Path header, once per file, before any fingerprint output.
    /// Quiet mode prefixes every line with the path instead.
    pub fn print_path(&mut self) -> Result<()> {
        if self.options.format == FormatMode::Quiet {
            return Ok(());
        }
        let header = format!("{}:", self.path);
        self.formatter.status(&header)
    }

    /// Announce the fingerprint whose examples come next. Detail mode
    /// prints the name immediately; summary holds it until the
    /// fingerprint produces a warning or failure; quiet folds it into
    /// each line instead.
    pub fn print_name(&mut self, fingerprint: &Fingerprint) -> Result<()> {
        self.current_name = fingerprint.display_name().to_string();
        self.name_printed = false;
        if self.options.format == FormatMode::Detail {
            self.name_printed = true;
            let name = self.current_name.clone();
            self.name_block(&name)?;
        }
        Ok(())
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        self.counts.successes += 1;
        self.counts.examples += 1;
        if self.options.format == FormatMode::Detail {
            self.formatter.success(&format!("  {message}"))?;
        }
        Ok(())
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        self.counts.examples += 1;
        if !self.options.warnings {
            // Untracked warnings still count as evaluated examples but
            // enter no tally; detail output shows them anyway.
            if self.options.format == FormatMode::Detail {
                self.formatter.warning(&format!("  {message}"))?;
            }
            return Ok(());
        }
        self.counts.warnings += 1;
        self.problem_line(message, false)
    }

    pub fn failure(&mut self, message: &str) -> Result<()> {
        self.counts.failures += 1;
        self.counts.examples += 1;
        self.problem_line(message, true)
    }

    /// Write the file's summary block and fold its tallies into the
    /// run counters. `total` is the number of fingerprints the file
    /// declared, which is not the number of examples evaluated.
    pub fn report(&mut self, total: usize) -> Result<()> {
        match self.options.format {
            FormatMode::Quiet => {}
            FormatMode::Summary => {
                let text = format!(
                    "SUMMARY: {} and {} out of {}",
                    plural(self.counts.failures, "failure"),
                    plural(self.counts.warnings, "warning"),
                    plural(total, "fingerprint"),
                );
                self.formatter.blank()?;
                self.formatter.summary(&text, self.summary_class())?;
            }
            FormatMode::Detail => {
                let class = self.summary_class();
                let verified = format!(
                    "SUMMARY: verified {} with {}",
                    plural(total, "fingerprint"),
                    plural(self.counts.examples, "example"),
                );
                let breakdown = format!(
                    "SUMMARY: {}, {}, {} ({:.1}% pass)",
                    plural(self.counts.successes, "success"),
                    plural(self.counts.warnings, "warning"),
                    plural(self.counts.failures, "failure"),
                    self.pass_rate(),
                );
                self.formatter.blank()?;
                self.formatter.summary(&verified, class)?;
                self.formatter.summary(&breakdown, class)?;
            }
        }

        self.totals.failures += self.counts.failures;
        self.totals.warnings += self.counts.warnings;
        Ok(())
    }

    pub fn failure_count(&self) -> usize {
        self.counts.failures
    }

    pub fn warning_count(&self) -> usize {
        self.counts.warnings
    }

    fn problem_line(&mut self, message: &str, is_failure: bool) -> Result<()> {
        self.announce_name()?;
        let line = match self.options.format {
            FormatMode::Quiet => format!("{}: {}: {message}", self.path, self.current_name),
            _ => format!("  {message}"),
        };
        if is_failure {
            self.formatter.failure(&line)
        } else {
            self.formatter.warning(&line)
        }
    }

    fn announce_name(&mut self) -> Result<()> {
        if self.options.format == FormatMode::Summary && !self.name_printed {
            self.name_printed = true;
            let name = self.current_name.clone();
            self.name_block(&name)?;
        }
        Ok(())
    }

    fn name_block(&mut self, name: &str) -> Result<()> {
        self.formatter.blank()?;
        self.formatter.status(name)
    }

    fn summary_class(&self) -> SummaryClass {
        if self.counts.failures > 0 {
            SummaryClass::Failures
        } else if self.counts.warnings > 0 {
            SummaryClass::Warnings
        } else {
            SummaryClass::Clean
        }
    }

    /// Percentage of tallied outcomes that succeeded. An empty file
    /// has nothing wrong with it, so it passes at 100%.
    fn pass_rate(&self) -> f64 {
        if self.counts.total() == 0 {
            100.0
        } else {
            self.counts.successes as f64 * 100.0 / self.counts.total() as f64
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else if word.ends_with('s') {
        format!("{count} {word}es")
    } else {
        format!("{count} {word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Outcome;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use regex::Regex;
    use std::collections::BTreeMap;

    fn fingerprint(name: &str) -> Fingerprint {
        Fingerprint {
            name: name.to_string(),
            pattern: Regex::new(".*").unwrap(),
            params: BTreeMap::new(),
            examples: Vec::new(),
        }
    }

    fn options(format: FormatMode, warnings: bool) -> VerifierOptions {
        VerifierOptions {
            format,
            color: false,
            warnings,
        }
    }

    /// Drives one reporter over a scripted file and returns its output.
    fn run_file(
        options: VerifierOptions,
        totals: &mut RunCounters,
        script: impl FnOnce(&mut Reporter<&mut Vec<u8>>),
        fingerprint_total: usize,
    ) -> String {
        let mut out = Vec::new();
        let mut formatter = Formatter::new(options.clone(), &mut out);
        let mut reporter =
            Reporter::new(options, &mut formatter, "db/ssh.toml".to_string(), totals);
        reporter.print_path().unwrap();
        script(&mut reporter);
        reporter.report(fingerprint_total).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn summary_clean_file_prints_header_and_summary_only() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Summary, true),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.success("SSH-2.0-OpenSSH_8.4p1").unwrap();
                r.success("SSH-2.0-OpenSSH_9.0").unwrap();
            },
            1,
        );
        assert_eq!(
            text,
            "db/ssh.toml:\n\nSUMMARY: 0 failures and 0 warnings out of 1 fingerprint\n"
        );
        assert_eq!(totals, RunCounters::default());
    }

    #[test]
    fn summary_prints_name_before_first_problem_only() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Summary, true),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.failure("FAIL: first").unwrap();
                r.failure("FAIL: second").unwrap();
            },
            1,
        );
        assert_eq!(
            text,
            "db/ssh.toml:\n\
             \n\
             OpenSSH banner\n\
             \x20 FAIL: first\n\
             \x20 FAIL: second\n\
             \n\
             SUMMARY: 2 failures and 0 warnings out of 1 fingerprint\n"
        );
        assert_eq!(totals.failures, 2);
    }

    #[test]
    fn summary_skips_names_of_clean_fingerprints() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Summary, true),
            &mut totals,
            |r| {
                let clean = fingerprint("clean one");
                r.print_name(&clean).unwrap();
                r.success("ok").unwrap();

                let warned = fingerprint("warned one");
                r.print_name(&warned).unwrap();
                r.warning("WARN: 'warned one' has no examples").unwrap();
            },
            2,
        );
        assert!(!text.contains("clean one"));
        assert!(text.contains("\nwarned one\n"));
        assert_eq!(totals.warnings, 1);
    }

    #[test]
    fn quiet_emits_prefixed_problem_lines_only() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Quiet, true),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.success("fine").unwrap();
                r.failure("FAIL: example 'x' failed to match 'y'").unwrap();
                r.warning("WARN: 'other' has no examples").unwrap();
            },
            1,
        );
        assert_eq!(
            text,
            "db/ssh.toml: OpenSSH banner: FAIL: example 'x' failed to match 'y'\n\
             db/ssh.toml: OpenSSH banner: WARN: 'other' has no examples\n"
        );
        assert_eq!(totals.failures, 1);
        assert_eq!(totals.warnings, 1);
    }

    #[test]
    fn quiet_clean_file_prints_nothing() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Quiet, true),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.success("fine").unwrap();
            },
            1,
        );
        assert_eq!(text, "");
    }

    #[test]
    fn detail_prints_every_line_and_expanded_summary() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Detail, true),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.success("SSH-2.0-OpenSSH_8.4p1").unwrap();
                r.failure("FAIL: example 'telnet' failed to match 'ssh'")
                    .unwrap();
            },
            1,
        );
        assert_eq!(
            text,
            "db/ssh.toml:\n\
             \n\
             OpenSSH banner\n\
             \x20 SSH-2.0-OpenSSH_8.4p1\n\
             \x20 FAIL: example 'telnet' failed to match 'ssh'\n\
             \n\
             SUMMARY: verified 1 fingerprint with 2 examples\n\
             SUMMARY: 1 success, 0 warnings, 1 failure (50.0% pass)\n"
        );
    }

    #[test]
    fn detail_empty_file_passes_at_one_hundred_percent() {
        let mut totals = RunCounters::new();
        let text = run_file(options(FormatMode::Detail, true), &mut totals, |_| {}, 0);
        assert_eq!(
            text,
            "db/ssh.toml:\n\
             \n\
             SUMMARY: verified 0 fingerprints with 0 examples\n\
             SUMMARY: 0 successes, 0 warnings, 0 failures (100.0% pass)\n"
        );
    }

    #[test]
    fn untracked_warnings_vanish_from_compact_modes() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Summary, false),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.warning("WARN: 'OpenSSH banner' has no examples").unwrap();
            },
            1,
        );
        assert_eq!(
            text,
            "db/ssh.toml:\n\nSUMMARY: 0 failures and 0 warnings out of 1 fingerprint\n"
        );
        assert_eq!(totals, RunCounters::default());
    }

    #[test]
    fn untracked_warnings_still_show_in_detail() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Detail, false),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.warning("WARN: 'OpenSSH banner' has no examples").unwrap();
            },
            1,
        );
        assert!(text.contains("  WARN: 'OpenSSH banner' has no examples\n"));
        // Shown but not counted: the summary stays clean.
        assert!(text.contains("0 warnings"));
        assert_eq!(totals, RunCounters::default());
    }

    #[test]
    fn untracked_warnings_still_count_toward_detail_examples() {
        let mut totals = RunCounters::new();
        let text = run_file(
            options(FormatMode::Detail, false),
            &mut totals,
            |r| {
                let fp = fingerprint("OpenSSH banner");
                r.print_name(&fp).unwrap();
                r.success("SSH-2.0-OpenSSH_8.4p1").unwrap();
                r.warning(
                    "WARN: example 'SSH-2.0-OpenSSH_9.0' expects 'os.vendor' \
                     which 'OpenSSH banner' does not declare",
                )
                .unwrap();
            },
            1,
        );
        // Both examples ran, so the verified line says two even though
        // the warning entered no tally.
        assert_eq!(
            text,
            "db/ssh.toml:\n\
             \n\
             OpenSSH banner\n\
             \x20 SSH-2.0-OpenSSH_8.4p1\n\
             \x20 WARN: example 'SSH-2.0-OpenSSH_9.0' expects 'os.vendor' \
             which 'OpenSSH banner' does not declare\n\
             \n\
             SUMMARY: verified 1 fingerprint with 2 examples\n\
             SUMMARY: 1 success, 0 warnings, 0 failures (100.0% pass)\n"
        );
        assert_eq!(totals, RunCounters::default());
    }

    #[test]
    fn per_file_counts_are_readable_after_reporting() {
        let options = options(FormatMode::Quiet, true);
        let mut totals = RunCounters::new();
        let mut out = Vec::new();
        let mut formatter = Formatter::new(options.clone(), &mut out);
        let mut reporter =
            Reporter::new(options, &mut formatter, "db/ssh.toml".to_string(), &mut totals);

        let fp = fingerprint("subject");
        reporter.print_name(&fp).unwrap();
        reporter.failure("FAIL: a").unwrap();
        reporter.failure("FAIL: b").unwrap();
        reporter.warning("WARN: c").unwrap();
        reporter.report(1).unwrap();

        assert_eq!(reporter.failure_count(), 2);
        assert_eq!(reporter.warning_count(), 1);
    }

    #[test]
    fn totals_accumulate_across_files() {
        let mut totals = RunCounters::new();
        run_file(
            options(FormatMode::Quiet, true),
            &mut totals,
            |r| {
                let fp = fingerprint("first");
                r.print_name(&fp).unwrap();
                r.failure("FAIL: a").unwrap();
            },
            1,
        );
        run_file(
            options(FormatMode::Quiet, true),
            &mut totals,
            |r| {
                let fp = fingerprint("second");
                r.print_name(&fp).unwrap();
                r.failure("FAIL: b").unwrap();
                r.warning("WARN: c").unwrap();
            },
            1,
        );
        assert_eq!(
            totals,
            RunCounters {
                failures: 2,
                warnings: 1,
            }
        );
    }

    #[test]
    fn pluralizes_counts() {
        assert_eq!(plural(0, "failure"), "0 failures");
        assert_eq!(plural(1, "failure"), "1 failure");
        assert_eq!(plural(2, "warning"), "2 warnings");
        assert_eq!(plural(1, "fingerprint"), "1 fingerprint");
        assert_eq!(plural(3, "success"), "3 successes");
        assert_eq!(plural(1, "success"), "1 success");
    }

    proptest! {
        /// However outcomes are interleaved, the run counters equal the
        /// number of failures plus tracked warnings, and successes never
        /// count toward either.
        #[test]
        fn counters_match_outcome_fold(
            outcomes in prop::collection::vec(
                prop_oneof![
                    Just(Outcome::Success),
                    Just(Outcome::Warn),
                    Just(Outcome::Fail),
                ],
                0..40,
            ),
            track_warnings in any::<bool>(),
        ) {
            let mut totals = RunCounters::new();
            run_file(
                options(FormatMode::Quiet, track_warnings),
                &mut totals,
                |r| {
                    let fp = fingerprint("subject");
                    r.print_name(&fp).unwrap();
                    for outcome in &outcomes {
                        match outcome {
                            Outcome::Success => r.success("ok").unwrap(),
                            Outcome::Warn => r.warning("WARN: w").unwrap(),
                            Outcome::Fail => r.failure("FAIL: f").unwrap(),
                        }
                    }
                },
                1,
            );

            let fails = outcomes.iter().filter(|o| **o == Outcome::Fail).count();
            let warns = outcomes.iter().filter(|o| **o == Outcome::Warn).count();
            prop_assert_eq!(totals.failures, fails);
            prop_assert_eq!(totals.warnings, if track_warnings { warns } else { 0 });
        }
    }
}
