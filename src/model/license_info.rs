//! Per-package provider inputs (spec §3, §4.6).

use super::findings::{CopyrightFinding, LicenseFinding};
use super::provenance::Provenance;
use crate::curation::LicenseFindingCuration;
use crate::path_exclude::PathExclude;
use crate::spdx::SpdxExpression;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A package-level curation applied while deriving concluded/declared
/// license info (spec §4.6). Unlike [`LicenseFindingCuration`] (which
/// rewrites a single detected finding), this operates on the package record
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPackageCuration {
    pub id: String,
    pub concluded_license: Option<SpdxExpression>,
    /// `(raw declared string, mapped SPDX expression)`, when this curation
    /// contributed a declared-license mapping.
    pub declared_license_mapping: Option<(String, SpdxExpression)>,
    pub comment: String,
}

/// Spec §3: `ConcludedLicenseInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcludedLicenseInfo {
    pub concluded_license: Option<SpdxExpression>,
    pub applied_curations: Vec<AppliedPackageCuration>,
}

/// Spec §3: the `processed-declared` part of `DeclaredLicenseInfo` — the
/// raw declared strings mapped onto SPDX, the unmapped leftovers, and their
/// `AND`-fold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDeclaredLicense {
    pub spdx_expression: Option<SpdxExpression>,
    /// raw declared string -> the SPDX expression it was mapped to.
    pub mapped: BTreeMap<String, SpdxExpression>,
    pub unmapped: BTreeSet<String>,
}

/// Spec §3: `DeclaredLicenseInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaredLicenseInfo {
    pub authors: BTreeSet<String>,
    pub raw_licenses: Vec<String>,
    pub processed: ProcessedDeclaredLicense,
    pub applied_curations: Vec<AppliedPackageCuration>,
}

/// Spec §3: `Findings` — one per scan result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub provenance: Provenance,
    pub license_findings: Vec<LicenseFinding>,
    pub copyright_findings: Vec<CopyrightFinding>,
    pub license_finding_curations: Vec<LicenseFindingCuration>,
    pub path_excludes: Vec<PathExclude>,
    pub relative_findings_path: String,
}

impl Findings {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            license_findings: Vec::new(),
            copyright_findings: Vec::new(),
            license_finding_curations: Vec::new(),
            path_excludes: Vec::new(),
            relative_findings_path: String::new(),
        }
    }
}

/// Spec §3: `DetectedLicenseInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedLicenseInfo {
    pub findings: Vec<Findings>,
}

/// The raw, per-package view returned by [`crate::provider::LicenseInfoProvider::get`]
/// (spec §4.6), combining the three source views the resolver consolidates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub concluded: ConcludedLicenseInfo,
    pub declared: DeclaredLicenseInfo,
    pub detected: DetectedLicenseInfo,
}
