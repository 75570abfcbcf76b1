//! The data model shared by every resolver component (spec §3).
//!
//! Package identifiers, provenance, text locations and findings are the
//! inputs; `ResolvedLicenseInfo` and friends are the outputs of
//! [`crate::resolver::LicenseInfoResolver::resolve_license_info`].

mod findings;
mod identifiers;
mod license_info;
mod provenance;
mod resolved;
mod text_location;

pub use findings::{CopyrightFinding, LicenseFinding};
pub use identifiers::Identifier;
pub use license_info::{
    AppliedPackageCuration, ConcludedLicenseInfo, DeclaredLicenseInfo, DetectedLicenseInfo,
    Findings, LicenseInfo, ProcessedDeclaredLicense,
};
pub use provenance::{Provenance, StorageKey};
pub use resolved::{
    LicenseSource, ResolvedCopyright, ResolvedCopyrightFinding, ResolvedLicense,
    ResolvedLicenseFile, ResolvedLicenseFileInfo, ResolvedLicenseInfo, ResolvedLicenseLocation,
    ResolvedOriginalExpression,
};
pub use text_location::TextLocation;
