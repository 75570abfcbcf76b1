//! Configuration and orchestration for resolving raw provider license info
//! into [`crate::model::ResolvedLicenseInfo`].

use crate::classifications::LicenseClassifications;
use crate::curation::{self, CurationOutcome};
use crate::findings_matcher::{self, MatchTolerance};
use crate::model::{
    CopyrightFinding, Identifier, LicenseFinding, LicenseInfo, LicenseSource, Provenance,
    ResolvedCopyrightFinding, ResolvedLicense, ResolvedLicenseFile, ResolvedLicenseFileInfo, ResolvedLicenseInfo,
    ResolvedLicenseLocation, ResolvedOriginalExpression,
};
use crate::path_exclude;
use crate::provider::{CopyrightStatementsProcessor, FileArchiver, LicenseInfoProvider, PackageConfigurationProvider};
use crate::root_license::{self, RootLicenseMatcherConfig};
use crate::spdx::{Operator, SingleLicenseExpression, SpdxExpression, SpdxLicenseChoice};
use crate::view::LicenseView;
use crate::{LicenseResolverError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use tracing::warn;

/// Tunables controlling how raw provider data is turned into resolved
/// license info. Constructed via [`ResolverConfigBuilder`] or
/// [`ResolverConfig::default`].
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub match_tolerance: MatchTolerance,
    /// Exact copyright statement strings treated as boilerplate noise and
    /// filed under `copyright_garbage` rather than matched to a license.
    pub copyright_garbage: BTreeSet<String>,
    /// Known license classification schemes, validated at construction.
    pub classifications: LicenseClassifications,
    /// Whether to synthesise copyright findings from declared-license
    /// authors (spec §4.7 step 4, §6).
    pub add_authors_to_copyrights: bool,
    /// Filename patterns the root-license matcher walks with (spec §4.5,
    /// §6 `license_filename_patterns`).
    pub root_license_matcher: RootLicenseMatcherConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            match_tolerance: MatchTolerance::default(),
            copyright_garbage: BTreeSet::new(),
            classifications: LicenseClassifications::default(),
            add_authors_to_copyrights: false,
            root_license_matcher: RootLicenseMatcherConfig::default(),
        }
    }
}

/// Fluent builder for [`ResolverConfig`], in the style of this crate's
/// other builders: each method consumes and returns `self`, `build()`
/// finalizes.
#[derive(Debug, Clone, Default)]
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn match_tolerance(mut self, tolerance: MatchTolerance) -> Self {
        self.config.match_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn copyright_garbage(mut self, garbage: impl IntoIterator<Item = String>) -> Self {
        self.config.copyright_garbage = garbage.into_iter().collect();
        self
    }

    #[must_use]
    pub fn classifications(mut self, classifications: LicenseClassifications) -> Self {
        self.config.classifications = classifications;
        self
    }

    #[must_use]
    pub fn add_authors_to_copyrights(mut self, enabled: bool) -> Self {
        self.config.add_authors_to_copyrights = enabled;
        self
    }

    #[must_use]
    pub fn root_license_matcher(mut self, matcher: RootLicenseMatcherConfig) -> Self {
        self.config.root_license_matcher = matcher;
        self
    }

    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

/// Orchestrates `resolve_license_info`/`resolve_license_files` over
/// whatever [`LicenseInfoProvider`] the caller supplies, memoizing both by
/// package identifier so repeated lookups (e.g. from a shared dependency
/// graph) are computed once.
pub struct LicenseInfoResolver {
    provider: Arc<dyn LicenseInfoProvider>,
    package_config: Option<Arc<dyn PackageConfigurationProvider>>,
    archiver: Option<Arc<dyn FileArchiver>>,
    copyright_processor: Option<Arc<dyn CopyrightStatementsProcessor>>,
    config: ResolverConfig,
    license_info_cache: RwLock<HashMap<Identifier, Arc<ResolvedLicenseInfo>>>,
    license_files_cache: RwLock<HashMap<Identifier, Arc<ResolvedLicenseFileInfo>>>,
    /// Unpacked archive directories backing `ResolvedLicenseFile::path`
    /// entries, kept alive for the resolver's own lifetime rather than let
    /// `TempDir::drop` remove them the moment `resolve_license_files`
    /// returns (spec §4.7, §9).
    extracted_dirs: RwLock<Vec<tempfile::TempDir>>,
}

impl LicenseInfoResolver {
    pub fn new(provider: Arc<dyn LicenseInfoProvider>, config: ResolverConfig) -> Self {
        Self {
            provider,
            package_config: None,
            archiver: None,
            copyright_processor: None,
            config,
            license_info_cache: RwLock::new(HashMap::new()),
            license_files_cache: RwLock::new(HashMap::new()),
            extracted_dirs: RwLock::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_package_configuration_provider(mut self, provider: Arc<dyn PackageConfigurationProvider>) -> Self {
        self.package_config = Some(provider);
        self
    }

    #[must_use]
    pub fn with_archiver(mut self, archiver: Arc<dyn FileArchiver>) -> Self {
        self.archiver = Some(archiver);
        self
    }

    #[must_use]
    pub fn with_copyright_processor(mut self, processor: Arc<dyn CopyrightStatementsProcessor>) -> Self {
        self.copyright_processor = Some(processor);
        self
    }

    /// The configured [`CopyrightStatementsProcessor`], if any, for callers
    /// passing it through to [`crate::model::ResolvedLicense::get_copyrights`]
    /// (spec §4.7 "copyright post-processing").
    pub fn copyright_processor(&self) -> Option<&Arc<dyn CopyrightStatementsProcessor>> {
        self.copyright_processor.as_ref()
    }

    /// Resolve `id`'s license info, memoizing on success. A previous error
    /// is not cached, so a transient provider failure can be retried.
    pub fn resolve_license_info(&self, id: &Identifier) -> Result<Arc<ResolvedLicenseInfo>> {
        if let Some(cached) = self.license_info_cache.read().expect("cache lock poisoned").get(id) {
            return Ok(Arc::clone(cached));
        }

        let raw = self.provider.get(id).map_err(|_| LicenseResolverError::unknown_package(id))?;
        let resolved = Arc::new(self.resolve(id, raw)?);

        self.license_info_cache
            .write()
            .expect("cache lock poisoned")
            .insert(id.clone(), Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Extract and resolve `id`'s license files using the configured
    /// [`FileArchiver`], memoizing on success. Returns an empty
    /// [`ResolvedLicenseFileInfo`] when no archiver is configured (spec
    /// §4.7).
    pub fn resolve_license_files(&self, id: &Identifier) -> Result<Arc<ResolvedLicenseFileInfo>> {
        if let Some(cached) = self.license_files_cache.read().expect("cache lock poisoned").get(id) {
            return Ok(Arc::clone(cached));
        }

        let Some(archiver) = self.archiver.as_ref() else {
            let empty = Arc::new(ResolvedLicenseFileInfo {
                id: id.clone(),
                files: Vec::new(),
            });
            self.license_files_cache
                .write()
                .expect("cache lock poisoned")
                .insert(id.clone(), Arc::clone(&empty));
            return Ok(empty);
        };

        let resolved_info = self.resolve_license_info(id)?;
        let matcher_config = self.config.root_license_matcher.clone().without_fallback();

        // One archive unpack per distinct provenance referenced by any
        // resolved location (spec §4.7).
        let mut provenances: BTreeSet<Provenance> = BTreeSet::new();
        for license in resolved_info.licenses() {
            for location in &license.locations {
                provenances.insert(location.provenance.clone());
            }
        }

        let mut files = Vec::new();
        for provenance in provenances {
            let temp_dir = tempfile::tempdir().map_err(|e| {
                LicenseResolverError::archive(
                    format!("resolving license files for {id}"),
                    crate::error::ArchiveErrorKind::TempDirCreation(e.to_string()),
                )
            })?;

            if let Err(err) = archiver.unpack(&provenance, temp_dir.path()) {
                warn!(%id, %provenance, error = %err, "archive unpack failed, skipping");
                continue;
            }

            let dir_path = temp_dir.path().to_path_buf();
            let vcs_path = provenance.vcs_path();
            let locations_at_path: Vec<&ResolvedLicenseLocation> = resolved_info
                .licenses()
                .iter()
                .flat_map(|l| l.locations.iter())
                .filter(|l| l.provenance == provenance)
                .collect();

            let all_paths: Vec<&str> = locations_at_path.iter().map(|l| l.location.path()).collect();
            let applicable = root_license::applicable_files(all_paths, [vcs_path], &matcher_config);
            let license_files = applicable.get(vcs_path).cloned().unwrap_or_default();

            for relative_path in license_files {
                let licenses_here: Vec<SingleLicenseExpression> = resolved_info
                    .licenses()
                    .iter()
                    .filter(|l| {
                        l.locations
                            .iter()
                            .any(|loc| loc.provenance == provenance && loc.location.path() == relative_path)
                    })
                    .map(|l| l.license.clone())
                    .collect();

                files.push(ResolvedLicenseFile {
                    provenance: provenance.clone(),
                    licenses: licenses_here,
                    relative_path: relative_path.to_string(),
                    path: dir_path.join(relative_path),
                });
            }

            self.extracted_dirs.write().expect("cache lock poisoned").push(temp_dir);
        }

        let resolved = Arc::new(ResolvedLicenseFileInfo {
            id: id.clone(),
            files,
        });
        self.license_files_cache
            .write()
            .expect("cache lock poisoned")
            .insert(id.clone(), Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Resolve every identifier in `ids` concurrently via `rayon`, returning
    /// results in the same order as `ids`. A convenience over calling
    /// `resolve_license_info` in a loop for callers resolving a whole
    /// dependency graph at once.
    pub fn batch_resolve(&self, ids: &[Identifier]) -> Vec<Result<Arc<ResolvedLicenseInfo>>> {
        use rayon::prelude::*;
        ids.par_iter().map(|id| self.resolve_license_info(id)).collect()
    }

    fn resolve(&self, id: &Identifier, raw: LicenseInfo) -> Result<ResolvedLicenseInfo> {
        let mut info = ResolvedLicenseInfo::new(id.clone(), raw.clone());
        let mut licenses: BTreeMap<SingleLicenseExpression, ResolvedLicense> = BTreeMap::new();

        if let Some(concluded) = &raw.concluded.concluded_license {
            add_original_expression(&mut licenses, concluded, LicenseSource::Concluded, false);
        }

        let mut declared_leaves: Vec<SingleLicenseExpression> = Vec::new();
        if let Some(declared) = &raw.declared.processed.spdx_expression {
            add_original_expression(&mut licenses, declared, LicenseSource::Declared, false);
            declared_leaves = declared.decompose().into_iter().collect();
            // Only attribute a raw declared string to the leaves its own
            // mapping decomposed to, not every leaf of the package's
            // overall declared expression (spec §4.7 step 3).
            for (raw_string, mapped_expression) in &raw.declared.processed.mapped {
                for leaf in mapped_expression.decompose() {
                    if let Some(license) = licenses.get_mut(&leaf) {
                        license.original_declared_strings.insert(raw_string.clone());
                    }
                }
            }
        }

        if self.config.add_authors_to_copyrights && !raw.declared.authors.is_empty() && !declared_leaves.is_empty() {
            let copyrights: BTreeSet<ResolvedCopyrightFinding> = raw
                .declared
                .authors
                .iter()
                .map(|author| ResolvedCopyrightFinding {
                    statement: author_copyright_statement(author),
                    location: crate::model::TextLocation::unknown(),
                    matching_path_excludes: Vec::new(),
                })
                .collect();
            let location = ResolvedLicenseLocation {
                provenance: Provenance::Unknown,
                location: crate::model::TextLocation::unknown(),
                applied_curation: None,
                matching_path_excludes: Vec::new(),
                copyrights,
            };
            for leaf in &declared_leaves {
                if let Some(license) = licenses.get_mut(leaf) {
                    license.locations.insert(location.clone());
                }
            }
        }

        // Aggregated across every detected finding for the whole package, not
        // just one `Findings` group, so that the same compound expression
        // detected under two different provenances/files is still recorded
        // as one original expression (spec §4.7 step 7, §4.4).
        let mut detected_excluded: BTreeMap<SpdxExpression, bool> = BTreeMap::new();
        for findings in &raw.detected.findings {
            self.resolve_detected_findings(id, findings, &mut licenses, &mut info, &mut detected_excluded);
        }
        for (expression, is_excluded) in detected_excluded {
            add_original_expression(&mut licenses, &expression, LicenseSource::Detected, is_excluded);
        }

        info.licenses = licenses.into_values().collect();
        Ok(info)
    }

    fn resolve_detected_findings(
        &self,
        id: &Identifier,
        findings: &crate::model::Findings,
        licenses: &mut BTreeMap<SingleLicenseExpression, ResolvedLicense>,
        info: &mut ResolvedLicenseInfo,
        detected_excluded: &mut BTreeMap<SpdxExpression, bool>,
    ) {
        let package_curations = self
            .package_config
            .as_ref()
            .map(|p| p.license_finding_curations(id, &findings.provenance))
            .unwrap_or_default();
        let package_excludes = self
            .package_config
            .as_ref()
            .map(|p| p.path_excludes(id, &findings.provenance))
            .unwrap_or_default();

        let mut all_curations = findings.license_finding_curations.clone();
        all_curations.extend(package_curations);
        let mut all_excludes = findings.path_excludes.clone();
        all_excludes.extend(package_excludes);

        let curation_results = curation::apply_all(
            &findings.license_findings,
            &all_curations,
            &findings.relative_findings_path,
        );

        // Unprefixed throughout: curation matching and path-exclude
        // matching both join `relative_findings_path` themselves, and
        // matching happens on the scanner's own per-file paths. Locations
        // are only prefixed once, at final storage time, in
        // `record_detected_license`.
        let mut curated_findings: Vec<(LicenseFinding, Option<crate::curation::LicenseFindingCuration>)> = Vec::new();
        for result in curation_results {
            match result.outcome {
                CurationOutcome::Suppressed => {}
                CurationOutcome::Curated(finding) => {
                    let applied_curation = result.applied.first().map(|(_, curation)| curation.clone());
                    curated_findings.push((finding, applied_curation));
                }
            }
        }

        let (garbage, real_copyrights): (Vec<CopyrightFinding>, Vec<CopyrightFinding>) = findings
            .copyright_findings
            .iter()
            .cloned()
            .partition(|c| self.config.copyright_garbage.contains(c.statement()));

        if !garbage.is_empty() {
            info.copyright_garbage
                .entry(findings.provenance.clone())
                .or_default()
                .extend(garbage);
        }

        // Per-file matching (spec §4.2): group findings and copyrights by
        // their scanned file path, then match within each group only.
        let mut findings_by_path: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (idx, (finding, _)) in curated_findings.iter().enumerate() {
            findings_by_path.entry(finding.location().path()).or_default().push(idx);
        }
        let mut copyrights_by_path: BTreeMap<&str, Vec<CopyrightFinding>> = BTreeMap::new();
        for copyright in &real_copyrights {
            copyrights_by_path.entry(copyright.location().path()).or_default().push(copyright.clone());
        }

        let mut all_paths: BTreeSet<&str> = findings_by_path.keys().copied().collect();
        all_paths.extend(copyrights_by_path.keys().copied());

        let mut copyrights_by_idx: BTreeMap<usize, Vec<CopyrightFinding>> = BTreeMap::new();
        let mut unmatched: Vec<CopyrightFinding> = Vec::new();

        for path in all_paths {
            let indices = findings_by_path.get(path).cloned().unwrap_or_default();
            let file_findings: Vec<LicenseFinding> = indices.iter().map(|&i| curated_findings[i].0.clone()).collect();
            let file_copyrights = copyrights_by_path.get(path).cloned().unwrap_or_default();

            let file_result = findings_matcher::match_findings(&file_findings, &file_copyrights, self.config.match_tolerance);

            for (local_idx, (_, copyrights)) in file_result.matches.into_iter().enumerate() {
                copyrights_by_idx.entry(indices[local_idx]).or_default().extend(copyrights);
            }
            unmatched.extend(file_result.unmatched);
        }

        // Cross-file root-license attribution (spec §4.2): every copyright
        // still unmatched after per-file matching is associated with every
        // license finding whose file name matches the root-license matcher.
        if !unmatched.is_empty() {
            let root_indices: Vec<usize> = curated_findings
                .iter()
                .enumerate()
                .filter(|(_, (finding, _))| {
                    let file_name = root_license::file_name_of(finding.location().path());
                    root_license::matches_license_file_name(file_name, &self.config.root_license_matcher)
                })
                .map(|(idx, _)| idx)
                .collect();

            if !root_indices.is_empty() {
                for idx in root_indices {
                    copyrights_by_idx.entry(idx).or_default().extend(unmatched.iter().cloned());
                }
                unmatched.clear();
            }
        }

        if !unmatched.is_empty() {
            info.unmatched_copyrights
                .entry(findings.provenance.clone())
                .or_default()
                .extend(unmatched);
        }

        for (idx, (finding, applied_curation)) in curated_findings.into_iter().enumerate() {
            let copyrights = copyrights_by_idx.remove(&idx).unwrap_or_default();
            let expression = finding.license().clone();
            let is_excluded = record_detected_license(
                licenses,
                &finding,
                &findings.provenance,
                applied_curation,
                &all_excludes,
                &findings.relative_findings_path,
                copyrights,
            );
            detected_excluded
                .entry(expression)
                .and_modify(|all_excluded| *all_excluded = *all_excluded && is_excluded)
                .or_insert(is_excluded);
        }
    }

    /// Apply a sequence of `given -> chosen` `OR` substitutions to an
    /// expression, as used to turn a package's open choices into one
    /// concrete effective license.
    pub fn apply_license_choices(&self, expression: &SpdxExpression, choices: &[SpdxLicenseChoice]) -> Result<SpdxExpression> {
        expression.apply_choices(choices)
    }
}

/// `"Copyright (C) " + author`, unless `author` already contains the
/// substring "copyright" case-insensitively, in which case it is used
/// verbatim (spec §4.7 step 4).
fn author_copyright_statement(author: &str) -> String {
    if author.to_ascii_lowercase().contains("copyright") {
        author.to_string()
    } else {
        format!("Copyright (C) {author}")
    }
}

fn add_original_expression(
    licenses: &mut BTreeMap<SingleLicenseExpression, ResolvedLicense>,
    expression: &SpdxExpression,
    source: LicenseSource,
    is_detected_excluded: bool,
) {
    for leaf in expression.decompose() {
        let entry = licenses
            .entry(leaf.clone())
            .or_insert_with(|| ResolvedLicense::new(leaf.clone()));
        entry.sources.insert(source);
        entry.original_expressions.insert(ResolvedOriginalExpression {
            expression: expression.clone(),
            source,
            is_detected_excluded,
        });
    }
}

/// Attach one matched `(license_finding, copyrights)` pair to the resolved
/// license set. `finding` and `copyrights` carry the scanner's own,
/// unprefixed locations; `relative_findings_path` is joined in both for
/// path-exclude evaluation and for the final stored location, matching how
/// curation matching (§4.3) and path-exclude matching (§4.4) already join it.
///
/// Only records this finding's `ResolvedLicenseLocation`; the caller
/// aggregates the returned `is_excluded` across every curated finding
/// sharing this finding's compound expression before recording the
/// expression's `ResolvedOriginalExpression` (spec §4.7 step 7, §4.4).
fn record_detected_license(
    licenses: &mut BTreeMap<SingleLicenseExpression, ResolvedLicense>,
    finding: &LicenseFinding,
    provenance: &Provenance,
    applied_curation: Option<crate::curation::LicenseFindingCuration>,
    excludes: &[path_exclude::PathExclude],
    relative_findings_path: &str,
    copyrights: Vec<CopyrightFinding>,
) -> bool {
    let matching_path_excludes = path_exclude::matching_excludes(excludes, relative_findings_path, finding.location());
    let is_excluded = !matching_path_excludes.is_empty();

    let prefixed_finding = finding.with_location_prefix(relative_findings_path);

    let resolved_copyrights: BTreeSet<ResolvedCopyrightFinding> = copyrights
        .into_iter()
        .map(|c| {
            let matching = path_exclude::matching_excludes(excludes, relative_findings_path, c.location());
            let prefixed = c.with_location_prefix(relative_findings_path);
            ResolvedCopyrightFinding {
                statement: prefixed.statement().to_string(),
                location: prefixed.location().clone(),
                matching_path_excludes: matching,
            }
        })
        .collect();

    let location = ResolvedLicenseLocation {
        provenance: provenance.clone(),
        location: prefixed_finding.location().clone(),
        applied_curation,
        matching_path_excludes,
        copyrights: resolved_copyrights,
    };

    for leaf in prefixed_finding.license().decompose() {
        if let Some(license) = licenses.get_mut(&leaf) {
            license.locations.insert(location.clone());
        }
    }

    is_excluded
}

/// `effective_license(view, choices_lists…)` (spec §4.10):
///
/// 1. Filter `info` with `view`, taking sources into account.
/// 2. Collect every original SPDX expression from the remaining licenses
///    and `AND`-fold them (`None` if empty).
/// 3. Apply the concatenation of `choices_lists` in order.
/// 4. Compute `valid_choices` on the result and `OR`-fold those.
pub fn effective_license(
    view: LicenseView,
    info: &ResolvedLicenseInfo,
    choices_lists: &[&[SpdxLicenseChoice]],
) -> Result<Option<SpdxExpression>> {
    let selected = view.filter(info);

    let Some(base) = SpdxExpression::to_expression(
        selected
            .iter()
            .flat_map(|l| l.original_expressions.iter().map(|e| e.expression.clone())),
        Operator::And,
    ) else {
        return Ok(None);
    };

    let mut current = base;
    for choices in choices_lists {
        current = current.apply_choices(choices)?;
    }

    Ok(SpdxExpression::to_expression(current.valid_choices(), Operator::Or))
}

/// `apply_choices(choices, view)` (spec §4.10): the new `ResolvedLicenseInfo`
/// whose `licenses` is filtered to the single-license leaves present in the
/// effective license computed from `choices` and `view`.
pub fn apply_choices(choices: &[SpdxLicenseChoice], view: LicenseView, info: &ResolvedLicenseInfo) -> Result<ResolvedLicenseInfo> {
    let effective = effective_license(view, info, &[choices])?;
    let leaves: BTreeSet<SingleLicenseExpression> = effective.map(|e| e.decompose()).unwrap_or_default();
    let mut result = info.clone();
    result.licenses.retain(|l| leaves.contains(&l.license));
    Ok(result)
}
