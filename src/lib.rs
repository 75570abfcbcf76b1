//! **A license-information resolution engine for software-composition-analysis pipelines.**
//!
//! `license-resolver` consolidates raw scanner output (license and copyright
//! findings), declared-license metadata, concluded-license choices and a body
//! of configuration (curations, path excludes, copyright garbage, file
//! archives) into a single, per-package view of which licenses apply, where
//! they were found, which copyrights attach to each license, which findings
//! are excluded by policy, and which file(s) serve as the package's
//! authoritative license file.
//!
//! The crate does not scan source code, download anything, or render
//! reports: it is a pure post-processing engine that sits between a scanner
//! and a reporting/policy layer.
//!
//! ## Core Concepts & Modules
//!
//! - **[`spdx`]**: the SPDX expression algebra — decomposing a compound
//!   expression into its single-license leaves, recomposing leaves with
//!   `AND`/`OR`, and applying license choices.
//! - **[`model`]**: the data model shared by every other module — opaque
//!   package identifiers, provenance, text locations, findings, and the
//!   resolved output types.
//! - **[`pathmatch`]**: forward-slash, case-insensitive glob matching used by
//!   curations, path excludes and the root-license matcher.
//! - **[`curation`]**: applies [`curation::LicenseFindingCuration`] rules to
//!   raw license findings.
//! - **[`path_exclude`]**: evaluates [`path_exclude::PathExclude`] rules
//!   against finding locations.
//! - **[`findings_matcher`]**: nearest-neighbour association of copyright
//!   findings to license findings within a file.
//! - **[`root_license`]**: the ancestor-directory walk that attributes orphan
//!   copyrights and locates a package's license files.
//! - **[`classifications`]**: named license categories and their validated
//!   mapping onto single-license expressions.
//! - **[`view`]**: source-priority filtering over a resolved view.
//! - **[`provider`]**: the collaborator traits the resolver is built against
//!   ([`provider::LicenseInfoProvider`], [`provider::PackageConfigurationProvider`],
//!   [`provider::FileArchiver`], [`provider::CopyrightStatementsProcessor`]).
//! - **[`resolver`]**: the public entry point, [`resolver::LicenseInfoResolver`].
//! - **[`testing`]**: reference, in-memory implementations of the provider
//!   traits, useful for tests and as a starting point for a real backend.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::sync::Arc;
//! use license_resolver::model::Identifier;
//! use license_resolver::resolver::{LicenseInfoResolver, ResolverConfig};
//! use license_resolver::testing::InMemoryLicenseInfoProvider;
//!
//! let provider = InMemoryLicenseInfoProvider::new();
//! let resolver = LicenseInfoResolver::new(Arc::new(provider), ResolverConfig::default());
//!
//! let id = Identifier::new("Maven", "org.example", "demo", "1.0.0");
//! match resolver.resolve_license_info(&id) {
//!     Ok(resolved) => {
//!         for license in resolved.licenses() {
//!             println!("{}", license.license);
//!         }
//!     }
//!     Err(err) => eprintln!("failed to resolve {id}: {err}"),
//! }
//! ```

#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::similar_names
)]

pub mod classifications;
pub mod curation;
pub mod error;
pub mod findings_matcher;
pub mod model;
pub mod pathmatch;
pub mod path_exclude;
pub mod provider;
pub mod resolver;
pub mod root_license;
pub mod spdx;
pub mod testing;
pub mod view;

pub use error::{LicenseResolverError, Result};
pub use model::Identifier;
pub use resolver::{LicenseInfoResolver, ResolverConfig, ResolverConfigBuilder};
pub use view::LicenseView;
