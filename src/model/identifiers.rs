//! Package identifiers (spec §3).
//!
//! An [`Identifier`] is an opaque tuple compared by exact equality and
//! ordered lexicographically so that resolver output is deterministic
//! regardless of the order packages were discovered in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package (or project) identifier: `(type, namespace, name, version)`.
///
/// Two identifiers are equal iff all four components are equal; there is no
/// normalization beyond what the caller supplies, matching spec §3's
/// "compared by exact equality" rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    r#type: String,
    namespace: String,
    name: String,
    version: String,
}

impl Identifier {
    /// Create a new identifier from its four components.
    pub fn new(
        r#type: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The package type/ecosystem (e.g. `"Maven"`, `"NPM"`, `"Cargo"`).
    pub fn package_type(&self) -> &str {
        &self.r#type
    }

    /// The namespace (e.g. a Maven group id), possibly empty.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The package version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// True if this identifier denotes the enclosing project rather than a
    /// dependency (spec §4.6: the provider treats projects differently from
    /// packages when deriving declared licenses). By convention a project id
    /// has an empty package type.
    pub fn is_project(&self) -> bool {
        self.r#type.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.r#type, self.namespace, self.name, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_lexicographic_over_components() {
        let a = Identifier::new("Maven", "org.a", "lib", "1.0.0");
        let b = Identifier::new("Maven", "org.a", "lib", "2.0.0");
        let c = Identifier::new("Maven", "org.b", "lib", "1.0.0");
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn equality_requires_all_four_components() {
        let a = Identifier::new("Maven", "org.a", "lib", "1.0.0");
        let b = Identifier::new("Maven", "org.a", "lib", "1.0.1");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn project_identifier_has_empty_type() {
        let project = Identifier::new("", "", "demo", "1.0.0");
        assert!(project.is_project());
        let package = Identifier::new("Maven", "org.a", "lib", "1.0.0");
        assert!(!package.is_project());
    }
}
