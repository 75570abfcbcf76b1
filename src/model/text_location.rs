//! Text locations within a scanned file (spec §3).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sentinel line number meaning "no specific location" (spec §3).
pub const UNKNOWN_LINE: u32 = u32::MAX;

/// A location within a text file: a forward-slash path and a 1-based,
/// inclusive line range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextLocation {
    path: String,
    start_line: u32,
    end_line: u32,
}

impl TextLocation {
    /// A location spanning `[start_line, end_line]` (both 1-based, inclusive)
    /// within `path`. `path` is stored as given; callers are responsible for
    /// using forward slashes, per spec §3.
    pub fn new(path: impl Into<String>, start_line: u32, end_line: u32) -> Self {
        Self {
            path: path.into(),
            start_line,
            end_line,
        }
    }

    /// The sentinel "no specific location" value: path `"."`, both lines
    /// `UNKNOWN_LINE` (spec §3).
    pub fn unknown() -> Self {
        Self::new(".", UNKNOWN_LINE, UNKNOWN_LINE)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    pub fn is_unknown(&self) -> bool {
        self.path == "." && self.start_line == UNKNOWN_LINE && self.end_line == UNKNOWN_LINE
    }

    /// Return a copy of this location with `prefix` prepended to the path as
    /// `prefix/path` (spec §3: "relative-findings-path prepended"). An empty
    /// prefix is a no-op; prepending twice is the caller's error to avoid,
    /// per spec invariant 5 ("prepended exactly once").
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Self {
        if prefix.is_empty() {
            return self.clone();
        }
        Self {
            path: format!("{prefix}/{}", self.path),
            start_line: self.start_line,
            end_line: self.end_line,
        }
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.path, self.start_line, self.end_line)
    }
}

impl PartialOrd for TextLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TextLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.path, self.start_line, self.end_line).cmp(&(
            &other.path,
            other.start_line,
            other.end_line,
        ))
    }
}
