// Export modules for library usage
pub mod cli;
pub mod core;
pub mod errors;
pub mod io;
pub mod matcher;
pub mod parser;
pub mod verify;

// Re-export commonly used types
pub use crate::core::{FormatMode, Outcome, RunCounters, VerifierOptions};
pub use crate::errors::{ParseError, RunError};
pub use crate::matcher::{Example, ExampleSource, Fingerprint, FingerprintDb, Param};
pub use crate::parser::parse_file;
pub use crate::verify::{verify_all, Formatter, Reporter, Verifier};
