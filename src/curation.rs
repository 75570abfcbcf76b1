//! Curation matching and application (spec §4.3).

use crate::model::LicenseFinding;
use crate::pathmatch::{join_relative, PathGlob};
use crate::spdx::SpdxExpression;
use serde::{Deserialize, Serialize};

/// The `concluded_license` a curation assigns. `None` is the explicit SPDX
/// `NONE` sentinel (spec §4.3) meaning "suppress this finding", distinct
/// from a Rust `Option::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CuratedLicense {
    Expression(SpdxExpression),
    None,
}

/// `(glob, start_lines[], line_count?, detected_license?, concluded_license,
/// reason, comment)` (spec §4.3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseFindingCuration {
    pub glob: String,
    pub start_lines: Vec<u32>,
    pub line_count: Option<u32>,
    pub detected_license: Option<SpdxExpression>,
    pub concluded_license: CuratedLicense,
    pub reason: String,
    pub comment: String,
}

impl LicenseFindingCuration {
    /// `matches(finding, curation, relative_path)` (spec §4.3).
    pub fn matches(&self, finding: &LicenseFinding, relative_path: &str) -> bool {
        let glob = match PathGlob::compile(&self.glob) {
            Ok(glob) => glob,
            Err(_) => return false,
        };
        let joined = join_relative(relative_path, finding.location().path());
        if !glob.matches(&joined) {
            return false;
        }
        if !self.start_lines.is_empty() && !self.start_lines.contains(&finding.location().start_line()) {
            return false;
        }
        if let Some(line_count) = self.line_count {
            let actual = finding.location().end_line() - finding.location().start_line() + 1;
            if actual != line_count {
                return false;
            }
        }
        if let Some(detected) = &self.detected_license {
            if detected != finding.license() {
                return false;
            }
        }
        true
    }

    /// `apply(finding, curation)` (spec §4.3).
    pub fn apply(&self, finding: &LicenseFinding) -> CurationOutcome {
        match &self.concluded_license {
            CuratedLicense::None => CurationOutcome::Suppressed,
            CuratedLicense::Expression(license) => {
                CurationOutcome::Curated(finding.with_license(license.clone()))
            }
        }
    }
}

/// The result of applying one matching curation to one finding.
#[derive(Debug, Clone, PartialEq)]
pub enum CurationOutcome {
    Curated(LicenseFinding),
    Suppressed,
}

/// One distinct outcome produced by [`apply_all`], together with every
/// `(original_finding, curation)` pair that produced it (spec §4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseFindingCurationResult {
    pub outcome: CurationOutcome,
    pub applied: Vec<(LicenseFinding, LicenseFindingCuration)>,
}

/// `apply_all(findings, curations, relative_path)` (spec §4.3).
///
/// Every original finding appears at least once: if no curation matches it,
/// its outcome is the finding itself with an empty pair list. A finding
/// matched by several curations produces an independent result entry per
/// curation.
pub fn apply_all(
    findings: &[LicenseFinding],
    curations: &[LicenseFindingCuration],
    relative_path: &str,
) -> Vec<LicenseFindingCurationResult> {
    let mut results: Vec<LicenseFindingCurationResult> = Vec::new();

    let mut record = |outcome: CurationOutcome, pair: Option<(LicenseFinding, LicenseFindingCuration)>| {
        if let Some(existing) = results.iter_mut().find(|r| r.outcome == outcome) {
            existing.applied.extend(pair);
        } else {
            results.push(LicenseFindingCurationResult {
                outcome,
                applied: pair.into_iter().collect(),
            });
        }
    };

    for finding in findings {
        let matching: Vec<&LicenseFindingCuration> = curations
            .iter()
            .filter(|curation| curation.matches(finding, relative_path))
            .collect();

        if matching.is_empty() {
            record(CurationOutcome::Curated(finding.clone()), None);
            continue;
        }

        for curation in matching {
            let outcome = curation.apply(finding);
            record(outcome, Some((finding.clone(), curation.clone())));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextLocation;

    fn finding(license: &str, path: &str, start: u32, end: u32) -> LicenseFinding {
        LicenseFinding::new(
            SpdxExpression::parse(license).unwrap(),
            TextLocation::new(path, start, end),
            1.0,
        )
    }

    #[test]
    fn suppression_removes_finding_and_records_null_curated() {
        let curation = LicenseFindingCuration {
            glob: "src/**".to_string(),
            start_lines: vec![],
            line_count: None,
            detected_license: None,
            concluded_license: CuratedLicense::None,
            reason: "incorrect".to_string(),
            comment: "".to_string(),
        };
        let gpl_finding = finding("GPL-2.0-only", "src/foo.c", 3, 3);
        let results = apply_all(&[gpl_finding], std::slice::from_ref(&curation), "");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, CurationOutcome::Suppressed);
        assert_eq!(results[0].applied.len(), 1);
    }

    #[test]
    fn unmatched_finding_passes_through_with_empty_pairs() {
        let curations: Vec<LicenseFindingCuration> = vec![];
        let mit_finding = finding("MIT", "src/foo.c", 1, 1);
        let results = apply_all(&[mit_finding.clone()], &curations, "");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].outcome, CurationOutcome::Curated(mit_finding));
        assert!(results[0].applied.is_empty());
    }

    #[test]
    fn multiple_matching_curations_each_produce_an_entry() {
        let mit_finding = finding("MIT", "src/foo.c", 1, 1);
        let curation_a = LicenseFindingCuration {
            glob: "src/**".to_string(),
            start_lines: vec![],
            line_count: None,
            detected_license: None,
            concluded_license: CuratedLicense::Expression(SpdxExpression::parse("Apache-2.0").unwrap()),
            reason: "a".to_string(),
            comment: "".to_string(),
        };
        let curation_b = LicenseFindingCuration {
            glob: "src/**".to_string(),
            start_lines: vec![],
            line_count: None,
            detected_license: None,
            concluded_license: CuratedLicense::Expression(SpdxExpression::parse("BSD-3-Clause").unwrap()),
            reason: "b".to_string(),
            comment: "".to_string(),
        };
        let results = apply_all(&[mit_finding], &[curation_a, curation_b], "");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn matches_checks_glob_lines_and_detected_license() {
        let curation = LicenseFindingCuration {
            glob: "src/**".to_string(),
            start_lines: vec![3],
            line_count: Some(1),
            detected_license: Some(SpdxExpression::parse("GPL-2.0-only").unwrap()),
            concluded_license: CuratedLicense::None,
            reason: "".to_string(),
            comment: "".to_string(),
        };
        let matching = finding("GPL-2.0-only", "src/foo.c", 3, 3);
        assert!(curation.matches(&matching, ""));

        let wrong_line = finding("GPL-2.0-only", "src/foo.c", 4, 4);
        assert!(!curation.matches(&wrong_line, ""));

        let wrong_license = finding("MIT", "src/foo.c", 3, 3);
        assert!(!curation.matches(&wrong_license, ""));
    }
}
