//! Nearest-neighbour association between license and copyright findings
//! within a single scanned file (spec §4.2).

use crate::model::{CopyrightFinding, LicenseFinding};
use std::collections::BTreeMap;

/// Line-distance tolerances controlling how far a copyright statement may
/// sit from a license statement and still be considered its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchTolerance {
    /// Base window extended on either side of a license finding's own
    /// lines before a copyright is considered a candidate (spec §4.2
    /// `tolerance_lines`).
    pub lines: u32,
    /// Additional leftward expansion applied while consecutive copyright
    /// start-lines keep the gap small (spec §4.2 `expand_tolerance_lines`).
    pub expand_lines: u32,
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self {
            lines: 5,
            expand_lines: 2,
        }
    }
}

/// The outcome of matching one file's copyright findings to its license
/// findings.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    /// Copyright findings associated with each license finding, in the
    /// order the license findings were given. A copyright finding may
    /// appear under more than one license finding (spec §4.2 "ties").
    pub matches: Vec<(LicenseFinding, Vec<CopyrightFinding>)>,
    /// Copyright findings that matched no license finding in the file.
    pub unmatched: Vec<CopyrightFinding>,
}

/// An inclusive `[lo, hi]` line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    lo: u32,
    hi: u32,
}

impl Range {
    fn contains(&self, line: u32) -> bool {
        line >= self.lo && line <= self.hi
    }
}

/// Match `copyright_findings` to `license_findings`, both assumed to come
/// from the same file, per the spec §4.2 algorithm:
///
/// - 0 licenses: every copyright is unmatched.
/// - 1 license: every copyright matches that single license.
/// - N licenses: each license's matching range is its tolerance window,
///   expanded leftward across a run of nearby copyright start-lines; a
///   copyright matches every license whose range contains its start line.
pub fn match_findings(
    license_findings: &[LicenseFinding],
    copyright_findings: &[CopyrightFinding],
    tolerance: MatchTolerance,
) -> MatchResult {
    if license_findings.is_empty() {
        return MatchResult {
            matches: Vec::new(),
            unmatched: copyright_findings.to_vec(),
        };
    }

    if license_findings.len() == 1 {
        return MatchResult {
            matches: vec![(license_findings[0].clone(), copyright_findings.to_vec())],
            unmatched: Vec::new(),
        };
    }

    let mut copyright_lines: Vec<u32> = copyright_findings.iter().map(|c| c.location().start_line()).collect();
    copyright_lines.sort_unstable();
    copyright_lines.dedup();

    let ranges: Vec<Range> = license_findings
        .iter()
        .map(|lf| matching_range(lf, &copyright_lines, tolerance))
        .collect();

    let mut grouped: BTreeMap<usize, Vec<CopyrightFinding>> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for copyright in copyright_findings {
        let start = copyright.location().start_line();
        let mut matched_any = false;
        for (idx, range) in ranges.iter().enumerate() {
            if range.contains(start) {
                grouped.entry(idx).or_default().push(copyright.clone());
                matched_any = true;
            }
        }
        if !matched_any {
            unmatched.push(copyright.clone());
        }
    }

    let matches = license_findings
        .iter()
        .enumerate()
        .map(|(idx, lf)| (lf.clone(), grouped.remove(&idx).unwrap_or_default()))
        .collect();

    MatchResult { matches, unmatched }
}

/// The matching range for one license finding, per spec §4.2 step 3: a
/// base tolerance window, expanded leftward past `expanded_start` while
/// consecutive copyright start-lines sit within `expand_tolerance_lines` of
/// each other.
fn matching_range(license: &LicenseFinding, sorted_copyright_lines: &[u32], tolerance: MatchTolerance) -> Range {
    let ls = license.location().start_line();
    let le = license.location().end_line();

    let base_lo = ls.saturating_sub(tolerance.lines);
    let base_hi = std::cmp::max(ls.saturating_add(tolerance.lines), le);
    let base = Range { lo: base_lo, hi: base_hi };

    let in_base: Vec<u32> = sorted_copyright_lines.iter().copied().filter(|&l| base.contains(l)).collect();
    let Some(mut expanded_start) = in_base.into_iter().min() else {
        return base;
    };

    for &line in sorted_copyright_lines.iter().rev() {
        if line >= expanded_start {
            continue;
        }
        let gap = expanded_start - line;
        if gap <= tolerance.expand_lines {
            expanded_start = line;
        } else {
            break;
        }
    }

    Range {
        lo: std::cmp::min(base.lo, expanded_start),
        hi: base.hi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextLocation;
    use crate::spdx::SpdxExpression;

    fn license_finding(path: &str, start: u32, end: u32) -> LicenseFinding {
        LicenseFinding::new(SpdxExpression::parse("MIT").unwrap(), TextLocation::new(path, start, end), 1.0)
    }

    fn copyright_finding(path: &str, start: u32, end: u32) -> CopyrightFinding {
        CopyrightFinding::new("Copyright 2020 Jane", TextLocation::new(path, start, end))
    }

    #[test]
    fn no_licenses_leaves_every_copyright_unmatched() {
        let copyrights = vec![copyright_finding("a.c", 1, 1)];
        let result = match_findings(&[], &copyrights, MatchTolerance::default());
        assert!(result.matches.is_empty());
        assert_eq!(result.unmatched.len(), 1);
    }

    #[test]
    fn single_license_claims_every_copyright_in_the_file() {
        let licenses = vec![license_finding("a.c", 50, 50)];
        let copyrights = vec![copyright_finding("a.c", 1, 1), copyright_finding("a.c", 900, 900)];
        let result = match_findings(&licenses, &copyrights, MatchTolerance::default());
        assert_eq!(result.matches[0].1.len(), 2);
        assert!(result.unmatched.is_empty());
    }

    #[test]
    fn seed_scenario_2_nearest_neighbour_matching() {
        // spec §8 scenario 2: licenses at 10 and 100, copyrights at 8, 12, 98, 200.
        let licenses = vec![license_finding("a.c", 10, 10), license_finding("a.c", 100, 100)];
        let copyrights = vec![
            copyright_finding("a.c", 8, 8),
            copyright_finding("a.c", 12, 12),
            copyright_finding("a.c", 98, 98),
            copyright_finding("a.c", 200, 200),
        ];
        let result = match_findings(&licenses, &copyrights, MatchTolerance { lines: 5, expand_lines: 2 });

        let first_lines: Vec<u32> = result.matches[0].1.iter().map(|c| c.location().start_line()).collect();
        assert_eq!(first_lines, vec![8, 12]);

        let second_lines: Vec<u32> = result.matches[1].1.iter().map(|c| c.location().start_line()).collect();
        assert_eq!(second_lines, vec![98]);

        assert_eq!(result.unmatched.len(), 1);
        assert_eq!(result.unmatched[0].location().start_line(), 200);
    }

    #[test]
    fn expansion_walks_leftward_across_close_copyright_lines() {
        // license at line 20, tolerance 5 -> base range [15, 25]; the only
        // in-base copyright line is 15, and 14 is within expand_lines (2) of
        // it, so the range extends to 14. 11 is 3 away from 14, past the
        // expansion tolerance, so it stays outside.
        let licenses = vec![license_finding("a.c", 20, 20), license_finding("a.c", 60, 60)];
        let copyrights = vec![
            copyright_finding("a.c", 15, 15),
            copyright_finding("a.c", 14, 14),
            copyright_finding("a.c", 11, 11),
        ];
        let result = match_findings(&licenses, &copyrights, MatchTolerance { lines: 5, expand_lines: 2 });
        let matched_lines: Vec<u32> = result.matches[0].1.iter().map(|c| c.location().start_line()).collect();
        assert_eq!(matched_lines, vec![15, 14]);
        assert_eq!(result.unmatched.len(), 1);
        assert_eq!(result.unmatched[0].location().start_line(), 11);
    }

    #[test]
    fn ties_are_assigned_to_every_overlapping_license_range() {
        let licenses = vec![license_finding("a.c", 1, 1), license_finding("a.c", 11, 11)];
        let copyrights = vec![copyright_finding("a.c", 6, 6)];
        let result = match_findings(&licenses, &copyrights, MatchTolerance { lines: 5, expand_lines: 2 });
        assert_eq!(result.matches[0].1.len(), 1);
        assert_eq!(result.matches[1].1.len(), 1);
    }
}
