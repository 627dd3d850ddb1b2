//! Shared-dependency filtering: a package stays installed while any other enabled module
//! still declares it.

use modsync_schema::DependencySpec;
use std::collections::HashSet;

pub fn declared_packages<'a, I>(specs: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a DependencySpec>,
{
    specs.into_iter().map(|s| s.package.clone()).collect()
}

/// Candidates minus everything in `still_required`, order preserved.
pub fn removable_packages(
    candidates: &[DependencySpec],
    still_required: &HashSet<String>,
) -> Vec<DependencySpec> {
    candidates
        .iter()
        .filter(|spec| !still_required.contains(&spec.package))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modsync_schema::parse_dependencies;
    use pretty_assertions::assert_eq;

    #[test]
    fn keeps_packages_declared_elsewhere() {
        let mine = parse_dependencies(&["pkg/x:^1.0", "pkg/y", "pkg/z"]);
        let others = parse_dependencies(&["pkg/x:^2.0", "pkg/z"]);
        let still_required = declared_packages(&others);

        let removable = removable_packages(&mine, &still_required);
        let names: Vec<&str> = removable.iter().map(|s| s.package.as_str()).collect();
        assert_eq!(names, vec!["pkg/y"]);
    }

    #[test]
    fn everything_goes_when_nobody_else_needs_it() {
        let mine = parse_dependencies(&["pkg/x"]);
        let removable = removable_packages(&mine, &HashSet::new());
        assert_eq!(removable, mine);
    }
}
