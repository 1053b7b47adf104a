//! Fingerprint model and the example-verification engine.
//!
//! The engine walks a fingerprint's embedded examples in declaration
//! order and hands exactly one `(Outcome, message)` pair per example to
//! a visitor, so reporting can stream while a large database is still
//! being evaluated.

use std::collections::BTreeMap;
use std::path::PathBuf;

use regex::Regex;

use crate::core::Outcome;

/// Name shown for fingerprints that do not declare one.
pub const UNNAMED: &str = "[unnamed]";

/// A pattern parameter: a static value when `pos` is zero, otherwise a
/// reference to that capture group of the pattern.
#[derive(Clone, Debug)]
pub struct Param {
    pub pos: usize,
    pub value: Option<String>,
}

/// Where an example's input text came from. File-backed examples keep
/// the file name so reports can refer to it instead of dumping the
/// payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExampleSource {
    Inline,
    File(String),
}

/// An embedded self-test: input text plus the field values the
/// fingerprint is expected to extract from it.
#[derive(Clone, Debug)]
pub struct Example {
    pub content: String,
    pub source: ExampleSource,
    pub expects: BTreeMap<String, String>,
}

impl Example {
    /// Label used in report messages: the file name for file-backed
    /// examples, the input text itself otherwise.
    pub fn label(&self) -> &str {
        match &self.source {
            ExampleSource::File(name) => name,
            ExampleSource::Inline => &self.content,
        }
    }
}

/// A named matching rule with the parameters it extracts and the
/// examples that exercise it.
#[derive(Clone, Debug)]
pub struct Fingerprint {
    pub name: String,
    pub pattern: Regex,
    pub params: BTreeMap<String, Param>,
    pub examples: Vec<Example>,
}

impl Fingerprint {
    /// Name as shown in reports.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNNAMED
        } else {
            &self.name
        }
    }

    /// Run every embedded example, invoking `emit` once per example
    /// with its outcome and message. A fingerprint without examples
    /// emits a single warning instead, since an unexercised pattern
    /// proves nothing.
    pub fn verify_examples<F>(&self, mut emit: F)
    where
        F: FnMut(Outcome, String),
    {
        if self.examples.is_empty() {
            emit(
                Outcome::Warn,
                format!("'{}' has no examples", self.display_name()),
            );
            return;
        }

        for example in &self.examples {
            let (outcome, message) = self.verify_example(example);
            emit(outcome, message);
        }
    }

    fn verify_example(&self, example: &Example) -> (Outcome, String) {
        let label = example.label();

        let Some(captures) = self.pattern.captures(&example.content) else {
            return (
                Outcome::Fail,
                format!(
                    "example '{label}' failed to match '{}'",
                    self.pattern.as_str()
                ),
            );
        };

        // Assertions against undeclared params are suspicious but not
        // conclusive, so they only warn; the first failed assertion
        // settles the example outright.
        let mut undeclared: Option<String> = None;
        for (key, expected) in &example.expects {
            let Some(param) = self.params.get(key) else {
                if undeclared.is_none() {
                    undeclared = Some(format!(
                        "example '{label}' expects '{key}' which '{}' does not declare",
                        self.display_name()
                    ));
                }
                continue;
            };

            let actual = if param.pos == 0 {
                param.value.as_deref()
            } else {
                captures.get(param.pos).map(|group| group.as_str())
            };

            match actual {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return (
                        Outcome::Fail,
                        format!("example '{label}' expected {key}='{expected}', got '{actual}'"),
                    );
                }
                None => {
                    return (
                        Outcome::Fail,
                        format!(
                            "example '{label}' expected {key}='{expected}', \
                             but '{key}' was not captured"
                        ),
                    );
                }
            }
        }

        match undeclared {
            Some(message) => (Outcome::Warn, message),
            None => (Outcome::Success, label.to_string()),
        }
    }
}

/// Fingerprints loaded from one database file, in declaration order,
/// with the path they came from for reporting.
#[derive(Clone, Debug)]
pub struct FingerprintDb {
    pub path: PathBuf,
    pub fingerprints: Vec<Fingerprint>,
}

impl FingerprintDb {
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fingerprints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fingerprint> {
        self.fingerprints.iter()
    }
}
