//! Loads fingerprint database files.
//!
//! The on-disk format is TOML with one `[[fingerprint]]` table per
//! rule. Unknown fields are rejected, file-backed example payloads are
//! read eagerly, and every structural rule (flag alphabet, param
//! positions, example payload exclusivity) is enforced before a
//! [`FingerprintDb`] is returned.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::errors::ParseError;
use crate::matcher::{Example, ExampleSource, Fingerprint, FingerprintDb, Param, UNNAMED};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDb {
    #[serde(default)]
    fingerprint: Vec<RawFingerprint>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFingerprint {
    #[serde(default)]
    name: String,
    pattern: String,
    flags: Option<String>,
    #[serde(default)]
    params: BTreeMap<String, RawParam>,
    #[serde(default)]
    examples: Vec<RawExample>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParam {
    pos: usize,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExample {
    input: Option<String>,
    file: Option<String>,
    #[serde(default)]
    expects: BTreeMap<String, String>,
}

/// Parse one database file into an ordered [`FingerprintDb`].
///
/// File-backed examples resolve relative to a directory named after the
/// database file: `db/ssh.toml` loads them from `db/ssh/`.
pub fn parse_file(path: &Path) -> Result<FingerprintDb, ParseError> {
    let text = fs::read_to_string(path).map_err(|source| ParseError::Read { source })?;
    let raw: RawDb = toml::from_str(&text).map_err(|source| ParseError::Toml { source })?;

    let example_dir = example_dir_for(path);
    let mut fingerprints = Vec::with_capacity(raw.fingerprint.len());
    for raw_fp in raw.fingerprint {
        fingerprints.push(build_fingerprint(raw_fp, &example_dir)?);
    }

    log::debug!(
        "loaded {} fingerprints from {}",
        fingerprints.len(),
        path.display()
    );

    Ok(FingerprintDb {
        path: path.to_path_buf(),
        fingerprints,
    })
}

fn example_dir_for(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    match path.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

fn build_fingerprint(raw: RawFingerprint, example_dir: &Path) -> Result<Fingerprint, ParseError> {
    let display = if raw.name.is_empty() {
        UNNAMED.to_string()
    } else {
        raw.name.clone()
    };

    let pattern = compile_pattern(&raw.pattern, raw.flags.as_deref(), &display)?;
    // captures_len counts the implicit whole-match group 0.
    let group_count = pattern.captures_len() - 1;

    let mut params = BTreeMap::new();
    for (key, raw_param) in raw.params {
        check_param(&key, &raw_param, group_count, &display)?;
        params.insert(
            key,
            Param {
                pos: raw_param.pos,
                value: raw_param.value,
            },
        );
    }

    let mut examples = Vec::with_capacity(raw.examples.len());
    for (index, raw_example) in raw.examples.into_iter().enumerate() {
        examples.push(build_example(raw_example, index + 1, example_dir, &display)?);
    }

    Ok(Fingerprint {
        name: raw.name,
        pattern,
        params,
        examples,
    })
}

fn compile_pattern(pattern: &str, flags: Option<&str>, name: &str) -> Result<Regex, ParseError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.unwrap_or_default().chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            other => {
                return Err(ParseError::Flag {
                    name: name.to_string(),
                    flag: other,
                })
            }
        }
    }
    builder.build().map_err(|source| ParseError::Pattern {
        name: name.to_string(),
        source,
    })
}

fn check_param(
    key: &str,
    raw: &RawParam,
    group_count: usize,
    name: &str,
) -> Result<(), ParseError> {
    let reason = if raw.pos == 0 {
        match &raw.value {
            Some(value) if !value.is_empty() => None,
            _ => Some("static param requires a non-empty value".to_string()),
        }
    } else if raw.value.is_some() {
        Some("capture params must not declare a value".to_string())
    } else if raw.pos > group_count {
        Some(format!(
            "pos {} exceeds the pattern's {group_count} capture groups",
            raw.pos
        ))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ParseError::Param {
            name: name.to_string(),
            param: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn build_example(
    raw: RawExample,
    index: usize,
    example_dir: &Path,
    name: &str,
) -> Result<Example, ParseError> {
    let (content, source) = match (raw.input, raw.file) {
        (Some(input), None) => (input, ExampleSource::Inline),
        (None, Some(file)) => {
            let full = example_dir.join(&file);
            let content = fs::read_to_string(&full).map_err(|source| ParseError::ExampleFile {
                name: name.to_string(),
                file: file.clone(),
                source,
            })?;
            (content, ExampleSource::File(file))
        }
        _ => {
            return Err(ParseError::Example {
                name: name.to_string(),
                index,
                reason: "requires exactly one of 'input' or 'file'".to_string(),
            })
        }
    };

    Ok(Example {
        content,
        source,
        expects: raw.expects,
    })
}
