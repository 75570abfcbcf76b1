//! Forward-slash, case-insensitive glob matching (spec §4.2-§4.5 POSIX glob
//! dialect, `**` crossing path segments).
//!
//! Grounded on the `glob` crate dependency carried by the `AerynOS-tools`
//! pack repo. `glob::Pattern` with `require_literal_separator: false`
//! already treats `**` (and `*`) as crossing `/` boundaries, which is
//! exactly the "forward-slash POSIX globs, `**` = any segments" dialect
//! spec §4.3/§4.4 calls for.

use glob::{MatchOptions, Pattern, PatternError};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled path glob, anchored relative to a package root and matched
/// case-insensitively against forward-slash paths.
#[derive(Debug, Clone)]
pub struct PathGlob {
    raw: String,
    pattern: Pattern,
}

impl PathGlob {
    /// Compile `glob`. Returns an error if the glob is malformed.
    pub fn compile(glob: &str) -> Result<Self, PatternError> {
        Ok(Self {
            raw: glob.to_string(),
            pattern: Pattern::new(glob)?,
        })
    }

    /// The original glob string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `path` (a forward-slash path) matches this glob.
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }
}

impl PartialEq for PathGlob {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl Eq for PathGlob {}

impl std::hash::Hash for PathGlob {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for PathGlob {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PathGlob {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

/// Join a findings-relative prefix and a finding's own path the way spec
/// §4.3/§4.4 require: `relative_path + "/" + location.path"`. An empty
/// prefix yields just `path` (no leading slash introduced).
pub fn join_relative(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{prefix}/{path}")
    }
}
