//! Resolver output types (spec §5).

use super::findings::CopyrightFinding;
use super::provenance::Provenance;
use super::text_location::TextLocation;
use super::identifiers::Identifier;
use super::license_info::LicenseInfo;
use crate::curation::LicenseFindingCuration;
use crate::path_exclude::PathExclude;
use crate::spdx::{SingleLicenseExpression, SpdxExpression};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Which of the three raw views (declared, detected, concluded) contributed
/// a [`ResolvedLicense`] (spec §5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LicenseSource {
    Declared,
    Detected,
    Concluded,
}

/// One `AND`/`OR` expression that decomposed to a leaf license, tagged with
/// the view it came from and whether it fell under a path exclude.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedOriginalExpression {
    pub expression: SpdxExpression,
    pub source: LicenseSource,
    pub is_detected_excluded: bool,
}

/// A raw copyright finding together with every path exclude matching its
/// location (spec §5).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolvedCopyrightFinding {
    pub statement: String,
    pub location: TextLocation,
    pub matching_path_excludes: Vec<PathExclude>,
}

/// One text location a resolved license was detected at, with the curation
/// (if any) that produced it, the path excludes covering it, and the
/// copyright findings matched to it by nearest-neighbour association
/// (spec §4.2, §5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLicenseLocation {
    pub provenance: Provenance,
    pub location: TextLocation,
    pub applied_curation: Option<LicenseFindingCuration>,
    pub matching_path_excludes: Vec<PathExclude>,
    pub copyrights: BTreeSet<ResolvedCopyrightFinding>,
}

impl PartialOrd for ResolvedLicenseLocation {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Eq for ResolvedLicenseLocation {}
impl Ord for ResolvedLicenseLocation {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (&self.provenance, &self.location).cmp(&(&other.provenance, &other.location))
    }
}

/// A copyright statement merged across every location it was found at,
/// optionally processed through a [`crate::provider::CopyrightStatementsProcessor`]
/// (spec §5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCopyright {
    pub statement: String,
    pub findings: BTreeSet<ResolvedCopyrightFinding>,
}

/// One SPDX single-license identifier in a package's resolved license set,
/// together with the provenance of every supporting original expression,
/// location and declared string (spec §5).
///
/// `sources` is stored explicitly rather than derived on read, matching the
/// rest of this model's preference for explicit fields over lazily
/// memoised accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLicense {
    pub license: SingleLicenseExpression,
    pub original_declared_strings: BTreeSet<String>,
    pub original_expressions: BTreeSet<ResolvedOriginalExpression>,
    pub locations: BTreeSet<ResolvedLicenseLocation>,
    pub sources: BTreeSet<LicenseSource>,
}

impl ResolvedLicense {
    pub fn new(license: SingleLicenseExpression) -> Self {
        Self {
            license,
            original_declared_strings: BTreeSet::new(),
            original_expressions: BTreeSet::new(),
            locations: BTreeSet::new(),
            sources: BTreeSet::new(),
        }
    }

    /// Copyright statements associated with this license's locations, merged
    /// by statement text and optionally normalised through `process`.
    ///
    /// When `omit_excluded` is set, copyright findings whose location is
    /// covered by at least one path exclude are dropped from the result.
    pub fn get_copyrights(
        &self,
        process: Option<&dyn crate::provider::CopyrightStatementsProcessor>,
        omit_excluded: bool,
    ) -> Vec<ResolvedCopyright> {
        let mut by_statement: BTreeMap<String, BTreeSet<ResolvedCopyrightFinding>> = BTreeMap::new();

        for location in &self.locations {
            for finding in &location.copyrights {
                if omit_excluded && !finding.matching_path_excludes.is_empty() {
                    continue;
                }
                let statement = match process {
                    Some(processor) => processor.process(&finding.statement),
                    None => finding.statement.clone(),
                };
                by_statement.entry(statement).or_default().insert(finding.clone());
            }
        }

        by_statement
            .into_iter()
            .map(|(statement, findings)| ResolvedCopyright { statement, findings })
            .collect()
    }
}

impl PartialEq<SingleLicenseExpression> for ResolvedLicense {
    fn eq(&self, other: &SingleLicenseExpression) -> bool {
        &self.license == other
    }
}

impl ResolvedLicense {
    /// Whether this license is excluded (spec §4.4): its only source is
    /// `DETECTED` and every one of its locations carries at least one
    /// matching path exclude.
    pub fn is_excluded(&self) -> bool {
        self.sources == BTreeSet::from([LicenseSource::Detected])
            && !self.locations.is_empty()
            && self.locations.iter().all(|l| !l.matching_path_excludes.is_empty())
    }
}

/// One extracted license file (e.g. a `LICENSE` text) tied to the
/// provenance and on-disk location it was archived at (spec §4.6 file
/// collection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLicenseFile {
    pub provenance: Provenance,
    pub licenses: Vec<SingleLicenseExpression>,
    pub relative_path: String,
    pub path: PathBuf,
}

/// A package's resolved license files (spec §4.6).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedLicenseFileInfo {
    pub id: Identifier,
    pub files: Vec<ResolvedLicenseFile>,
}

/// The full resolved result for one package, returned by
/// [`crate::resolver::LicenseInfoResolver::resolve_license_info`] (spec §5).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLicenseInfo {
    pub id: Identifier,
    pub raw: LicenseInfo,
    pub licenses: Vec<ResolvedLicense>,
    /// Copyright findings discarded as garbage (e.g. matched generic
    /// boilerplate), keyed by the provenance they were found under.
    pub copyright_garbage: BTreeMap<Provenance, BTreeSet<CopyrightFinding>>,
    /// Copyright findings that could not be matched to any license finding.
    pub unmatched_copyrights: BTreeMap<Provenance, BTreeSet<CopyrightFinding>>,
}

impl ResolvedLicenseInfo {
    pub fn new(id: Identifier, raw: LicenseInfo) -> Self {
        Self {
            id,
            raw,
            licenses: Vec::new(),
            copyright_garbage: BTreeMap::new(),
            unmatched_copyrights: BTreeMap::new(),
        }
    }

    /// Explicit accessor rather than relying on `IntoIterator`, so callers
    /// see the resolved licenses as what they are: an ordered, owned list.
    pub fn licenses(&self) -> &[ResolvedLicense] {
        &self.licenses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedLicense> {
        self.licenses.iter()
    }

    /// Drop every license [`ResolvedLicense::is_excluded`] reports excluded
    /// (spec §4.4, §8 scenario 4).
    pub fn filter_excluded(&self) -> Self {
        let mut result = self.clone();
        result.licenses.retain(|l| !l.is_excluded());
        result
    }
}
