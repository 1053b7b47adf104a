//! Core value types shared across the verification pipeline.

/// Classification of a single example evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    Warn,
    Fail,
}

/// Output verbosity selected with `--format`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatMode {
    /// Failure and warning lines plus a per-file summary.
    #[default]
    Summary,
    /// Failure and warning lines only.
    Quiet,
    /// Every fingerprint and example, with an expanded summary.
    Detail,
}

impl FormatMode {
    /// Select a mode by the first character of the argument: `d` for
    /// detail, `q` for quiet. Unknown values fall back to summary
    /// rather than erroring.
    pub fn from_arg(arg: &str) -> Self {
        match arg.chars().next() {
            Some('d') => FormatMode::Detail,
            Some('q') => FormatMode::Quiet,
            _ => FormatMode::Summary,
        }
    }
}

/// Immutable configuration for one verification run.
#[derive(Clone, Debug)]
pub struct VerifierOptions {
    pub format: FormatMode,
    /// Apply ANSI styling to report lines.
    pub color: bool,
    /// Count warnings and reflect them in the exit code. When false,
    /// warnings are only visible in detail output.
    pub warnings: bool,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            format: FormatMode::Summary,
            color: false,
            warnings: true,
        }
    }
}

/// Problem tallies accumulated across a whole run. Counts only grow;
/// per-file detail lives in the reporter and is folded in when each
/// file completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub failures: usize,
    pub warnings: usize,
}

impl RunCounters {
    /// Highest exit status used to encode a problem count. Statuses
    /// above this are reserved for distinguished conditions such as
    /// usage errors and fatal aborts.
    pub const MAX_PROBLEM_EXIT: usize = 250;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.failures + self.warnings
    }

    /// Exit status for the run: the number of problems found, clamped
    /// so large runs cannot wrap around the 8-bit exit range and
    /// masquerade as success.
    pub fn exit_code(&self) -> i32 {
        self.total().min(Self::MAX_PROBLEM_EXIT) as i32
    }
}
