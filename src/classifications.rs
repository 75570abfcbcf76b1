//! License categories and categorisations (spec §4.9).

use crate::error::{ClassificationErrorKind, LicenseResolverError, Result};
use crate::spdx::SingleLicenseExpression;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// One categorisation entry: a single-license expression mapped to the set
/// of category names it belongs to (spec §4.9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseCategorisation {
    pub id: String,
    pub license: SingleLicenseExpression,
    pub categories: BTreeSet<String>,
}

impl LicenseCategorisation {
    pub fn new(id: impl Into<String>, license: SingleLicenseExpression, categories: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: id.into(),
            license,
            categories: categories.into_iter().collect(),
        }
    }
}

/// The full set of category names and license categorisations (spec
/// §4.9), validated at construction time so that resolved output never
/// needs to re-check these invariants. Derived lookup indices are computed
/// lazily on first access and memoised behind a [`OnceLock`], per spec §9's
/// "represent lazy memoised fields... as a thread-safe once-cell" note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseClassifications {
    categories: BTreeSet<String>,
    categorisations: Vec<LicenseCategorisation>,
    #[serde(skip)]
    licenses_by_category: OnceLock<BTreeMap<String, BTreeSet<SingleLicenseExpression>>>,
    #[serde(skip)]
    categories_by_license: OnceLock<BTreeMap<SingleLicenseExpression, BTreeSet<String>>>,
}

impl PartialEq for LicenseClassifications {
    fn eq(&self, other: &Self) -> bool {
        self.categories == other.categories && self.categorisations == other.categorisations
    }
}
impl Eq for LicenseClassifications {}

impl LicenseClassifications {
    /// Build and validate a classification set.
    ///
    /// Rejects duplicate category names, duplicate categorisation ids, and
    /// any categorisation referencing a category name absent from
    /// `categories` (spec §4.9, scenario 6).
    pub fn new(categories: Vec<String>, categorisations: Vec<LicenseCategorisation>) -> Result<Self> {
        let mut category_set = BTreeSet::new();
        for name in categories {
            if !category_set.insert(name.clone()) {
                return Err(LicenseResolverError::classifications(
                    "validating category names",
                    ClassificationErrorKind::DuplicateCategory(name),
                ));
            }
        }

        let mut seen_ids = BTreeSet::new();
        for categorisation in &categorisations {
            if !seen_ids.insert(categorisation.id.clone()) {
                return Err(LicenseResolverError::classifications(
                    "validating categorisation ids",
                    ClassificationErrorKind::DuplicateCategorisationId(categorisation.id.clone()),
                ));
            }
            for category_name in &categorisation.categories {
                if !category_set.contains(category_name) {
                    return Err(LicenseResolverError::classifications(
                        format!("validating categorisation {:?}", categorisation.id),
                        ClassificationErrorKind::UnknownCategory {
                            categorisation_id: categorisation.id.clone(),
                            category: category_name.clone(),
                        },
                    ));
                }
            }
        }

        Ok(Self {
            categories: category_set,
            categorisations,
            licenses_by_category: OnceLock::new(),
            categories_by_license: OnceLock::new(),
        })
    }

    /// Category names, sorted (spec §4.9 "sorted category names").
    pub fn category_names(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn categorisations(&self) -> &[LicenseCategorisation] {
        &self.categorisations
    }

    /// Every license categorised under `category`, computed once and
    /// memoised.
    pub fn licenses_by_category(&self, category: &str) -> BTreeSet<SingleLicenseExpression> {
        self.licenses_by_category_index().get(category).cloned().unwrap_or_default()
    }

    /// Every category name `license` is categorised under, computed once
    /// and memoised.
    pub fn categories_by_license(&self, license: &SingleLicenseExpression) -> BTreeSet<String> {
        self.categories_by_license_index().get(license).cloned().unwrap_or_default()
    }

    fn licenses_by_category_index(&self) -> &BTreeMap<String, BTreeSet<SingleLicenseExpression>> {
        self.licenses_by_category.get_or_init(|| {
            let mut index: BTreeMap<String, BTreeSet<SingleLicenseExpression>> = BTreeMap::new();
            for categorisation in &self.categorisations {
                for category in &categorisation.categories {
                    index.entry(category.clone()).or_default().insert(categorisation.license.clone());
                }
            }
            index
        })
    }

    fn categories_by_license_index(&self) -> &BTreeMap<SingleLicenseExpression, BTreeSet<String>> {
        self.categories_by_license.get_or_init(|| {
            let mut index: BTreeMap<SingleLicenseExpression, BTreeSet<String>> = BTreeMap::new();
            for categorisation in &self.categorisations {
                index
                    .entry(categorisation.license.clone())
                    .or_default()
                    .extend(categorisation.categories.iter().cloned());
            }
            index
        })
    }

    /// Merge `other` into `self` (spec §4.9 `merge`):
    ///
    /// For every license also present in `other`'s categorisations,
    /// categories drawn from `self` that are *also* defined as category
    /// names in `other` are dropped first (since the two classifications
    /// may use the same category name with different semantics); `other`'s
    /// categorisation for that license is then union-merged on top, and its
    /// id wins. Licenses `self` categorises that `other` leaves untouched
    /// are carried over unchanged. Category names left unused by any
    /// categorisation after merging are dropped from the result.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        let mut by_license: BTreeMap<SingleLicenseExpression, LicenseCategorisation> = BTreeMap::new();
        for categorisation in &self.categorisations {
            by_license.insert(categorisation.license.clone(), categorisation.clone());
        }

        for other_categorisation in &other.categorisations {
            by_license
                .entry(other_categorisation.license.clone())
                .and_modify(|existing| {
                    existing.categories.retain(|c| !other.categories.contains(c));
                    existing.categories.extend(other_categorisation.categories.iter().cloned());
                    existing.id = other_categorisation.id.clone();
                })
                .or_insert_with(|| other_categorisation.clone());
        }

        let merged_categorisations: Vec<LicenseCategorisation> = by_license.into_values().collect();

        let used_categories: BTreeSet<String> = merged_categorisations
            .iter()
            .flat_map(|c| c.categories.iter().cloned())
            .collect();

        Self::new(used_categories.into_iter().collect(), merged_categorisations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorisation(id: &str, license: &str, categories: &[&str]) -> LicenseCategorisation {
        LicenseCategorisation::new(
            id,
            SingleLicenseExpression::new(license),
            categories.iter().map(|s| s.to_string()),
        )
    }

    #[test]
    fn duplicate_category_name_is_rejected() {
        let err = LicenseClassifications::new(vec!["permissive".to_string(), "permissive".to_string()], vec![]).unwrap_err();
        assert!(matches!(err, LicenseResolverError::Classifications { .. }));
    }

    #[test]
    fn seed_scenario_6_unknown_category_is_rejected_then_succeeds() {
        // spec §8 scenario 6.
        let err = LicenseClassifications::new(
            vec!["permissive".to_string()],
            vec![categorisation("mit", "MIT", &["permissive", "unknown-cat"])],
        )
        .unwrap_err();
        assert!(matches!(err, LicenseResolverError::Classifications { .. }));

        let ok = LicenseClassifications::new(
            vec!["permissive".to_string()],
            vec![categorisation("mit", "MIT", &["permissive", "permissive"])],
        )
        .unwrap();
        let mit = SingleLicenseExpression::new("MIT");
        assert_eq!(ok.licenses_by_category("permissive"), BTreeSet::from([mit]));
    }

    #[test]
    fn duplicate_categorisation_id_is_rejected() {
        let err = LicenseClassifications::new(
            vec!["permissive".to_string()],
            vec![
                categorisation("mit", "MIT", &["permissive"]),
                categorisation("mit", "BSD-3-Clause", &["permissive"]),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, LicenseResolverError::Classifications { .. }));
    }

    #[test]
    fn categories_by_license_looks_up_every_category() {
        let classifications = LicenseClassifications::new(
            vec!["permissive".to_string(), "osi-approved".to_string()],
            vec![categorisation("mit", "MIT", &["permissive", "osi-approved"])],
        )
        .unwrap();
        let found = classifications.categories_by_license(&SingleLicenseExpression::new("MIT"));
        assert_eq!(found, BTreeSet::from(["permissive".to_string(), "osi-approved".to_string()]));
    }

    #[test]
    fn merge_drops_self_categories_redefined_in_other() {
        let a = LicenseClassifications::new(
            vec!["permissive".to_string()],
            vec![categorisation("primary", "MIT", &["permissive"])],
        )
        .unwrap();
        let b = LicenseClassifications::new(
            vec!["permissive".to_string()],
            vec![categorisation("primary", "MIT", &["permissive"])],
        )
        .unwrap();
        let merged = a.merge(&b).unwrap();
        // "permissive" is defined in both, so self's copy is dropped before
        // other's categorisation is merged on top; the category still ends
        // up attached once via `other`.
        let found = merged.categories_by_license(&SingleLicenseExpression::new("MIT"));
        assert_eq!(found, BTreeSet::from(["permissive".to_string()]));
    }

    #[test]
    fn merge_drops_unused_categories() {
        let a = LicenseClassifications::new(
            vec!["permissive".to_string(), "unused".to_string()],
            vec![categorisation("primary", "MIT", &["permissive"])],
        )
        .unwrap();
        let b = LicenseClassifications::new(vec![], vec![]).unwrap();
        let merged = a.merge(&b).unwrap();
        assert!(!merged.category_names().contains("unused"));
    }
}
