//! Raw scanner findings (spec §3).

use super::text_location::TextLocation;
use crate::spdx::SpdxExpression;
use serde::{Deserialize, Serialize};

/// A scanner-reported license occurrence at a text location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseFinding {
    license: SpdxExpression,
    location: TextLocation,
    score: f32,
}

impl LicenseFinding {
    pub fn new(license: SpdxExpression, location: TextLocation, score: f32) -> Self {
        Self {
            license,
            location,
            score,
        }
    }

    pub fn license(&self) -> &SpdxExpression {
        &self.license
    }

    pub fn location(&self) -> &TextLocation {
        &self.location
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    /// A copy of this finding with its license replaced, used by curation
    /// application (spec §4.3).
    #[must_use]
    pub fn with_license(&self, license: SpdxExpression) -> Self {
        Self {
            license,
            location: self.location.clone(),
            score: self.score,
        }
    }

    /// A copy of this finding with `relative_findings_path` prepended to its
    /// location (spec §4.6/§4.7).
    #[must_use]
    pub fn with_location_prefix(&self, prefix: &str) -> Self {
        Self {
            license: self.license.clone(),
            location: self.location.with_prefix(prefix),
            score: self.score,
        }
    }
}

/// A scanner-reported copyright occurrence at a text location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyrightFinding {
    statement: String,
    location: TextLocation,
}

impl PartialOrd for CopyrightFinding {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CopyrightFinding {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.location, &self.statement).cmp(&(&other.location, &other.statement))
    }
}

impl CopyrightFinding {
    pub fn new(statement: impl Into<String>, location: TextLocation) -> Self {
        Self {
            statement: statement.into(),
            location,
        }
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn location(&self) -> &TextLocation {
        &self.location
    }

    #[must_use]
    pub fn with_location_prefix(&self, prefix: &str) -> Self {
        Self {
            statement: self.statement.clone(),
            location: self.location.with_prefix(prefix),
        }
    }
}
