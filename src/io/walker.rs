use std::path::PathBuf;

use ignore::WalkBuilder;

use crate::errors::RunError;

/// Expands glob patterns into concrete database file paths.
///
/// Each pattern walks the tree under `base` on its own; every regular
/// file whose base-relative path matches is collected. Matches are
/// sorted per pattern so reports are stable across runs, and patterns
/// contribute their matches in command-line order.
pub struct PatternWalker {
    base: PathBuf,
}

impl PatternWalker {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Expand all `patterns`, failing on the first invalid pattern,
    /// walk error, or pattern that matches nothing. Returned paths are
    /// relative to `base`.
    pub fn expand(&self, patterns: &[String]) -> Result<Vec<PathBuf>, RunError> {
        let mut files = Vec::new();
        for pattern in patterns {
            files.extend(self.expand_one(pattern)?);
        }
        Ok(files)
    }

    fn expand_one(&self, pattern: &str) -> Result<Vec<PathBuf>, RunError> {
        let matcher = glob::Pattern::new(pattern).map_err(|source| RunError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut matches = Vec::new();
        let walker = WalkBuilder::new(&self.base)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(|source| RunError::Walk {
                pattern: pattern.to_string(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(&self.base).unwrap_or(path);
            if matcher.matches_path_with(relative, match_options()) {
                matches.push(relative.to_path_buf());
            }
        }

        if matches.is_empty() {
            return Err(RunError::NoMatches {
                pattern: pattern.to_string(),
            });
        }

        matches.sort();
        log::debug!("pattern '{pattern}' matched {} files", matches.len());
        Ok(matches)
    }
}

/// `*` stays within one path component; spanning directories takes an
/// explicit `**`.
fn match_options() -> glob::MatchOptions {
    glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}
