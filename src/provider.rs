//! The traits a caller implements to plug its own package metadata, scan
//! results and archive storage into the resolver.

use crate::model::{Identifier, LicenseInfo, Provenance};
use crate::path_exclude::PathExclude;
use crate::curation::LicenseFindingCuration;
use crate::Result;
use std::path::Path;

/// Supplies the raw `LicenseInfo` (concluded/declared/detected views) for a
/// package identifier. The resolver calls this once per package and
/// memoises the result.
pub trait LicenseInfoProvider: Send + Sync {
    /// The raw license info for `id`, or an error if `id` is not known to
    /// this provider.
    fn get(&self, id: &Identifier) -> Result<LicenseInfo>;
}

/// Supplies package-level curations and path excludes that are not carried
/// inline on a `Findings` record — e.g. from a separately maintained
/// curations repository keyed by package coordinates rather than by scan
/// result.
pub trait PackageConfigurationProvider: Send + Sync {
    /// License finding curations that apply to `id`'s findings under the
    /// scan result identified by `provenance`.
    fn license_finding_curations(&self, id: &Identifier, provenance: &Provenance) -> Vec<LicenseFindingCuration>;

    /// Path excludes that apply to `id`'s findings under the scan result
    /// identified by `provenance`.
    fn path_excludes(&self, id: &Identifier, provenance: &Provenance) -> Vec<PathExclude>;
}

/// Extracts a package's source tree for a given provenance into a local
/// directory, so license files can be located and copied out by
/// `resolve_license_files`.
pub trait FileArchiver: Send + Sync {
    /// Unpack the archive identified by `provenance` into `destination`,
    /// which the caller has already created.
    fn unpack(&self, provenance: &Provenance, destination: &Path) -> Result<()>;
}

/// Normalises a raw copyright statement before it is grouped with other
/// statements under the same license (e.g. stripping a leading `Copyright
/// (c)` marker, or deduplicating differently-punctuated renderings of the
/// same holder).
pub trait CopyrightStatementsProcessor: Send + Sync {
    fn process(&self, statement: &str) -> String;
}

/// A [`CopyrightStatementsProcessor`] that returns statements unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCopyrightProcessor;

impl CopyrightStatementsProcessor for IdentityCopyrightProcessor {
    fn process(&self, statement: &str) -> String {
        statement.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_processor_returns_input_unchanged() {
        let processor = IdentityCopyrightProcessor;
        assert_eq!(processor.process("Copyright 2020 Jane"), "Copyright 2020 Jane");
    }
}
