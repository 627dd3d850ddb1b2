//! Package specs derived from a descriptor's `dependencies` list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Constraint used when a dependency entry carries no `:version` part.
pub const ANY_VERSION: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencySpec {
    pub package: String,
    pub version_constraint: String,
}

impl DependencySpec {
    /// Parses `"vendor/pkg"` or `"vendor/pkg:^1.2"`.
    ///
    /// Only the first `:` separates package from constraint, so constraints such as
    /// `"dev-main:1.x"` survive intact. Returns `None` for an empty package id.
    pub fn parse(raw: &str) -> Option<Self> {
        let (package, version_constraint) = match raw.split_once(':') {
            Some((package, constraint)) => {
                let constraint = constraint.trim();
                let constraint = if constraint.is_empty() {
                    ANY_VERSION
                } else {
                    constraint
                };
                (package.trim(), constraint)
            }
            None => (raw.trim(), ANY_VERSION),
        };

        if package.is_empty() {
            return None;
        }

        Some(Self {
            package: package.to_string(),
            version_constraint: version_constraint.to_string(),
        })
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.version_constraint)
    }
}

/// Parses a declared dependency list in order.
///
/// A package listed twice keeps its first position and takes the last constraint.
pub fn parse_dependencies<S: AsRef<str>>(entries: &[S]) -> Vec<DependencySpec> {
    let mut specs: Vec<DependencySpec> = Vec::with_capacity(entries.len());
    for spec in entries.iter().filter_map(|e| DependencySpec::parse(e.as_ref())) {
        match specs.iter_mut().find(|s| s.package == spec.package) {
            Some(existing) => existing.version_constraint = spec.version_constraint,
            None => specs.push(spec),
        }
    }
    specs
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_package_defaults_to_any_version() {
        let spec = DependencySpec::parse("  guzzlehttp/guzzle ").unwrap();
        assert_eq!(spec.package, "guzzlehttp/guzzle");
        assert_eq!(spec.version_constraint, "*");
    }

    #[test]
    fn splits_on_first_colon_and_trims() {
        let spec = DependencySpec::parse("acme/tool : dev-main:1.x ").unwrap();
        assert_eq!(spec.package, "acme/tool");
        assert_eq!(spec.version_constraint, "dev-main:1.x");
        assert_eq!(spec.to_string(), "acme/tool:dev-main:1.x");
    }

    #[test]
    fn empty_package_is_rejected() {
        assert!(DependencySpec::parse("   ").is_none());
        assert!(DependencySpec::parse(":^1.0").is_none());
    }

    #[test]
    fn duplicate_packages_collapse_keeping_first_position() {
        let specs = parse_dependencies(&["a/one:^1.0", "b/two", "a/one:^2.0"]);
        let rendered: Vec<String> = specs.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a/one:^2.0", "b/two:*"]);
    }
}
