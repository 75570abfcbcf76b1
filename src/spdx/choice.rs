//! License choices fed to [`super::SpdxExpression::apply_choices`] (spec §4.1).

use super::SpdxExpression;
use serde::{Deserialize, Serialize};

/// An `SpdxLicenseChoice`: substitute the `OR` sub-expression `given` with
/// `chosen` wherever it occurs in an expression being resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpdxLicenseChoice {
    pub given: SpdxExpression,
    pub chosen: SpdxExpression,
}

impl SpdxLicenseChoice {
    pub fn new(given: SpdxExpression, chosen: SpdxExpression) -> Self {
        Self { given, chosen }
    }
}
