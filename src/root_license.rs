//! Root-license heuristic: attributing orphan copyrights and locating a
//! package's license files by walking a file's ancestor directories
//! (spec §4.5).

use crate::pathmatch::PathGlob;
use std::collections::{BTreeMap, BTreeSet};

/// Filename globs (case-insensitive) recognised as carrying a license text,
/// checked nearest-directory-first (spec §6 `license_filename_patterns`:
/// simple filename globs, `*` within a path segment).
pub const DEFAULT_LICENSE_FILE_NAMES: &[&str] = &["license*", "licence*", "copying*"];

/// Filename globs recognised as carrying patent grants, walked
/// independently of license/fallback names.
pub const DEFAULT_PATENT_FILE_NAMES: &[&str] = &["patents*"];

/// Filename globs used only when no directory on the walk up to the root
/// contains a match from [`DEFAULT_LICENSE_FILE_NAMES`] (spec §4.5 step 2).
pub const DEFAULT_FALLBACK_LICENSE_FILE_NAMES: &[&str] = &["notice*", "readme*"];

/// The three filename-pattern sets the root-license matcher walks with
/// (spec §4.5, §6 `license_filename_patterns`). Patterns are matched
/// case-insensitively against a bare filename only — anchoring to "this
/// directory" rather than globbing across the tree is the walk's job, not
/// the glob's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLicenseMatcherConfig {
    pub license_names: BTreeSet<PathGlob>,
    pub patent_names: BTreeSet<PathGlob>,
    pub fallback_license_names: BTreeSet<PathGlob>,
}

fn compile_defaults(patterns: &[&str]) -> BTreeSet<PathGlob> {
    patterns
        .iter()
        .map(|pattern| PathGlob::compile(pattern).expect("default root-license pattern is a valid glob"))
        .collect()
}

impl Default for RootLicenseMatcherConfig {
    fn default() -> Self {
        Self {
            license_names: compile_defaults(DEFAULT_LICENSE_FILE_NAMES),
            patent_names: compile_defaults(DEFAULT_PATENT_FILE_NAMES),
            fallback_license_names: compile_defaults(DEFAULT_FALLBACK_LICENSE_FILE_NAMES),
        }
    }
}

impl RootLicenseMatcherConfig {
    /// A config with the fallback name set emptied, as `resolve_license_files`
    /// (spec §4.7) requires ("configured without fallback names in this mode").
    #[must_use]
    pub fn without_fallback(mut self) -> Self {
        self.fallback_license_names.clear();
        self
    }
}

/// The ancestor directories of `path`, nearest first, including the root
/// (`""`). `"src/a/b/c.rs"` yields `["src/a/b", "src/a", "src", ""]`.
pub fn ancestor_directories(path: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut current = path;
    while let Some(idx) = current.rfind('/') {
        dirs.push(current[..idx].to_string());
        current = &current[..idx];
    }
    dirs.push(String::new());
    dirs
}

fn dir_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// The last path segment of `path`.
pub fn file_name_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn is_name_in(file_name: &str, globs: &BTreeSet<PathGlob>) -> bool {
    globs.iter().any(|glob| glob.matches(file_name))
}

/// `dir` itself followed by its ancestors up to and including the root
/// (`""`), nearest first. `"src/a"` yields `["src/a", "src", ""]`.
fn directory_chain(dir: &str) -> Vec<String> {
    if dir.is_empty() {
        return vec![String::new()];
    }
    // ancestor_directories treats its argument as a file path, so its
    // first element is already `dir` itself — reuse it rather than
    // duplicating `dir` as a separate first entry.
    ancestor_directories(&format!("{dir}/_"))
}

/// Whether `file_name` (the last path segment) is a recognised license
/// file name under the default configuration, checked case-insensitively.
/// Convenience wrapper over [`RootLicenseMatcherConfig::default`] for
/// callers without a custom pattern set.
pub fn is_root_license_file_name(file_name: &str) -> bool {
    matches_license_file_name(file_name, &RootLicenseMatcherConfig::default())
}

/// Whether `file_name` matches `config`'s license or patent name set,
/// case-insensitively. Used for cross-file root-license attribution (spec
/// §4.2), which checks only the filename and ignores directory position.
pub fn matches_license_file_name(file_name: &str, config: &RootLicenseMatcherConfig) -> bool {
    is_name_in(file_name, &config.license_names) || is_name_in(file_name, &config.patent_names)
}

/// Given every known relative file path in a package and a set of query
/// directories, return for each query directory the set of file paths that
/// apply to it per the spec §4.5 algorithm:
///
/// 1. Walk the query directory and its ancestors for a licence-name match;
///    stop at the first directory with any.
/// 2. If none found, repeat the walk using fallback licence names.
/// 3. Independently walk for patent names; emit the first non-empty set.
///
/// The two license-name searches and the patent search are all
/// nearest-directory-first and mutually independent, so a directory can
/// get license files from one search and patent files from the other.
pub fn applicable_files<'a>(
    all_paths: impl IntoIterator<Item = &'a str>,
    query_dirs: impl IntoIterator<Item = &'a str>,
    config: &RootLicenseMatcherConfig,
) -> BTreeMap<String, BTreeSet<&'a str>> {
    let all_paths: Vec<&str> = all_paths.into_iter().collect();

    // Pre-group paths by their containing directory so each ancestor walk
    // is a direct lookup rather than a re-scan of the whole file list.
    let mut by_dir: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for &path in &all_paths {
        by_dir.entry(dir_of(path)).or_default().push(path);
    }

    let mut result: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for query_dir in query_dirs {
        let mut files: BTreeSet<&str> = BTreeSet::new();

        if let Some(found) = walk_for_names(query_dir, &by_dir, &config.license_names) {
            files.extend(found);
        } else if let Some(found) = walk_for_names(query_dir, &by_dir, &config.fallback_license_names) {
            files.extend(found);
        }

        if let Some(found) = walk_for_names(query_dir, &by_dir, &config.patent_names) {
            files.extend(found);
        }

        result.insert(query_dir.to_string(), files);
    }
    result
}

/// Walk `dir` and its ancestors nearest-first, returning the files in the
/// first directory whose own files match any of `names`.
fn walk_for_names<'a>(dir: &str, by_dir: &BTreeMap<&str, Vec<&'a str>>, names: &BTreeSet<PathGlob>) -> Option<Vec<&'a str>> {
    if names.is_empty() {
        return None;
    }
    for candidate_dir in directory_chain(dir) {
        if let Some(files) = by_dir.get(candidate_dir.as_str()) {
            let matching: Vec<&str> = files.iter().copied().filter(|f| is_name_in(file_name_of(f), names)).collect();
            if !matching.is_empty() {
                return Some(matching);
            }
        }
    }
    None
}

/// Attribute an orphan copyright (one matched to no license finding) to
/// every "root license file" path known for the package, per spec §4.2's
/// cross-file root-license attribution: every unmatched copyright in the
/// package is associated with every license finding whose file path is
/// recognised as a root license file. Returns the empty set if no such
/// license file path is known.
pub fn root_license_file_paths<'a>(candidate_paths: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    candidate_paths
        .into_iter()
        .filter(|path| is_root_license_file_name(file_name_of(path)))
        .collect()
}
