//! License views: source-priority projections over a resolved license set
//! (spec §4.8).
//!
//! A view is an ordered list of *tiers*, each tier a set of sources drawn
//! from `{declared, detected, concluded}`. Filtering walks the tiers in
//! order and returns every resolved license whose source set intersects
//! the first tier that selects at least one license; it never mutates the
//! retained licenses' locations or copyrights.

use crate::model::{LicenseSource, ResolvedLicense, ResolvedLicenseInfo};
use std::collections::BTreeSet;

/// A named filter over [`ResolvedLicenseInfo::licenses`], one of the seven
/// predefined views spec §4.8 lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LicenseView {
    /// Every resolved license regardless of source.
    All,
    /// Concluded licenses if any exist, otherwise every other license.
    ConcludedOrRest,
    /// Concluded, then declared, then detected, each tried in turn.
    ConcludedOrDeclaredOrDetected,
    /// Concluded licenses if any exist, otherwise detected licenses.
    ConcludedOrDetected,
    /// Only licenses with a `Concluded` source.
    OnlyConcluded,
    /// Only licenses with a `Declared` source.
    OnlyDeclared,
    /// Only licenses with a `Detected` source.
    OnlyDetected,
}

type Tier = BTreeSet<LicenseSource>;

fn tier(sources: &[LicenseSource]) -> Tier {
    sources.iter().copied().collect()
}

impl LicenseView {
    /// This view's ordered tiers (spec §4.8).
    fn tiers(&self) -> Vec<Tier> {
        use LicenseSource::{Concluded, Declared, Detected};
        match self {
            Self::All => vec![tier(&[Declared, Detected, Concluded])],
            Self::ConcludedOrRest => vec![tier(&[Concluded]), tier(&[Declared, Detected])],
            Self::ConcludedOrDeclaredOrDetected => vec![tier(&[Concluded]), tier(&[Declared]), tier(&[Detected])],
            Self::ConcludedOrDetected => vec![tier(&[Concluded]), tier(&[Detected])],
            Self::OnlyConcluded => vec![tier(&[Concluded])],
            Self::OnlyDeclared => vec![tier(&[Declared])],
            Self::OnlyDetected => vec![tier(&[Detected])],
        }
    }

    /// Apply this view to `info`, returning the subset of
    /// [`ResolvedLicense`]s it selects (spec §4.8 `filter`).
    ///
    /// Walks the tiers in order; the first tier that selects at least one
    /// license wins. Filtering only drops whole licenses — the licenses
    /// that are kept are returned exactly as resolved, sources, locations
    /// and copyrights intact.
    pub fn filter<'a>(&self, info: &'a ResolvedLicenseInfo) -> Vec<&'a ResolvedLicense> {
        for tier in self.tiers() {
            let selected: Vec<&ResolvedLicense> = info
                .licenses()
                .iter()
                .filter(|l| !l.sources.is_disjoint(&tier))
                .collect();
            if !selected.is_empty() {
                return selected;
            }
        }
        Vec::new()
    }
}
