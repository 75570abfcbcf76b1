//! Unified error types for the license resolver.
//!
//! Mirrors the donor library's error hierarchy: a single `#[non_exhaustive]`
//! top-level error with per-subsystem kinds, chained via `#[source]`, plus a
//! small `ErrorContext` extension trait for attaching context as errors
//! propagate up through the resolver.

use thiserror::Error;

/// Main error type for license-resolver operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum LicenseResolverError {
    /// Errors in the SPDX expression algebra (§4.1).
    #[error("SPDX expression error: {context}")]
    Spdx {
        context: String,
        #[source]
        source: SpdxErrorKind,
    },

    /// Errors raised while resolving a package's license info (§4.7).
    #[error("License resolution failed: {context}")]
    Resolution {
        context: String,
        #[source]
        source: ResolutionErrorKind,
    },

    /// Construction-time invariant violations for license classifications (§4.9).
    #[error("Invalid classifications: {context}")]
    Classifications {
        context: String,
        #[source]
        source: ClassificationErrorKind,
    },

    /// Errors while unpacking an archive for `resolve_license_files` (§4.7, §6).
    #[error("Archive error: {context}")]
    Archive {
        context: String,
        #[source]
        source: ArchiveErrorKind,
    },

    /// IO errors with context.
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<std::path::PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// SPDX expression algebra error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SpdxErrorKind {
    #[error("failed to parse SPDX expression {expression:?}: {reason}")]
    ParseError { expression: String, reason: String },

    /// `apply_choices` was given a choice whose `given` sub-expression does
    /// not occur in the input expression. Spec §4.1 / §7: `InvalidLicenseChoice`.
    #[error("license choice {given:?} does not match any OR sub-expression of {expression:?}")]
    InvalidLicenseChoice { expression: String, given: String },
}

/// License resolution error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolutionErrorKind {
    /// Spec §7: `UnknownPackage`.
    #[error("no license info available for package identifier {0}")]
    UnknownPackage(String),
}

/// License classifications error kinds (constructed at `LicenseClassifications::new`).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ClassificationErrorKind {
    #[error("duplicate category name {0:?}")]
    DuplicateCategory(String),

    #[error("duplicate categorisation id {0:?}")]
    DuplicateCategorisationId(String),

    #[error("categorisation {categorisation_id:?} references unknown category {category:?}")]
    UnknownCategory {
        categorisation_id: String,
        category: String,
    },
}

/// Archive/unpack error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArchiveErrorKind {
    #[error("failed to create temp directory: {0}")]
    TempDirCreation(String),

    #[error("failed to copy archive contents: {0}")]
    CopyFailed(String),
}

/// Convenient Result type for license-resolver operations.
pub type Result<T> = std::result::Result<T, LicenseResolverError>;

impl LicenseResolverError {
    /// Create an SPDX error with context.
    pub fn spdx(context: impl Into<String>, source: SpdxErrorKind) -> Self {
        Self::Spdx {
            context: context.into(),
            source,
        }
    }

    /// Create an `InvalidLicenseChoice` error (spec §4.1, §7).
    pub fn invalid_license_choice(expression: impl Into<String>, given: impl Into<String>) -> Self {
        let expression = expression.into();
        let given = given.into();
        Self::spdx(
            format!("applying choice to {expression:?}"),
            SpdxErrorKind::InvalidLicenseChoice { expression, given },
        )
    }

    /// Create a resolution error with context.
    pub fn resolution(context: impl Into<String>, source: ResolutionErrorKind) -> Self {
        Self::Resolution {
            context: context.into(),
            source,
        }
    }

    /// Create an `UnknownPackage` error (spec §7).
    pub fn unknown_package(id: impl std::fmt::Display) -> Self {
        Self::resolution(
            "resolve_license_info",
            ResolutionErrorKind::UnknownPackage(id.to_string()),
        )
    }

    /// Create a classifications error with context.
    pub fn classifications(context: impl Into<String>, source: ClassificationErrorKind) -> Self {
        Self::Classifications {
            context: context.into(),
            source,
        }
    }

    /// Create an archive error with context.
    pub fn archive(context: impl Into<String>, source: ArchiveErrorKind) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context.
    pub fn io(path: impl Into<std::path::PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for LicenseResolverError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

/// Extension trait for adding context to errors as they propagate up through
/// the resolver, chaining contexts rather than overwriting them.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<LicenseResolverError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context(e.into(), &ctx))
    }
}

fn add_context(err: LicenseResolverError, new_ctx: &str) -> LicenseResolverError {
    match err {
        LicenseResolverError::Spdx { context, source } => LicenseResolverError::Spdx {
            context: chain(new_ctx, &context),
            source,
        },
        LicenseResolverError::Resolution { context, source } => LicenseResolverError::Resolution {
            context: chain(new_ctx, &context),
            source,
        },
        LicenseResolverError::Classifications { context, source } => {
            LicenseResolverError::Classifications {
                context: chain(new_ctx, &context),
                source,
            }
        }
        LicenseResolverError::Archive { context, source } => LicenseResolverError::Archive {
            context: chain(new_ctx, &context),
            source,
        },
        LicenseResolverError::Io {
            path,
            message,
            source,
        } => LicenseResolverError::Io {
            path,
            message: chain(new_ctx, &message),
            source,
        },
        LicenseResolverError::Config(msg) => LicenseResolverError::Config(chain(new_ctx, &msg)),
    }
}

fn chain(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
