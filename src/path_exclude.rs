//! Path exclude evaluation (spec §4.4).

use crate::model::TextLocation;
use crate::pathmatch::{join_relative, PathGlob};
use serde::{Deserialize, Serialize};

/// A rule marking paths whose findings are not policy-relevant but must
/// still be preserved for audit (spec glossary).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathExclude {
    glob: String,
    reason: String,
    comment: String,
}

impl PathExclude {
    pub fn new(glob: impl Into<String>, reason: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            reason: reason.into(),
            comment: comment.into(),
        }
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Whether this exclude's glob matches `relative_findings_path + "/" +
    /// location.path` (spec §4.4).
    pub fn matches(&self, relative_findings_path: &str, location: &TextLocation) -> bool {
        match PathGlob::compile(&self.glob) {
            Ok(glob) => glob.matches(&join_relative(relative_findings_path, location.path())),
            Err(_) => false,
        }
    }
}

/// Every `PathExclude` in `excludes` matching `location` (spec §4.4: "the
/// resolver records the list of all matching path excludes, not just the
/// first").
pub fn matching_excludes(
    excludes: &[PathExclude],
    relative_findings_path: &str,
    location: &TextLocation,
) -> Vec<PathExclude> {
    excludes
        .iter()
        .filter(|exclude| exclude.matches(relative_findings_path, location))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_joins_relative_path_and_location() {
        let exclude = PathExclude::new("test/**", "test-files", "excluded from policy");
        let location = TextLocation::new("foo.c", 1, 1);
        assert!(exclude.matches("test", &location));
        assert!(!exclude.matches("src", &location));
    }

    #[test]
    fn matching_excludes_returns_all_matches_not_just_first() {
        let excludes = vec![
            PathExclude::new("test/**", "r1", ""),
            PathExclude::new("**/*.c", "r2", ""),
        ];
        let location = TextLocation::new("foo.c", 1, 1);
        let matches = matching_excludes(&excludes, "test", &location);
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn no_match_returns_empty_list() {
        let excludes = vec![PathExclude::new("docs/**", "r1", "")];
        let location = TextLocation::new("foo.c", 1, 1);
        assert!(matching_excludes(&excludes, "src", &location).is_empty());
    }
}
