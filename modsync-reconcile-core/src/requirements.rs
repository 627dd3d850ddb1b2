//! Planning for a module's required-module list.

/// Where a required module stands right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementState {
    /// No module directory or no descriptor.
    Missing,
    Enabled,
    /// Present on disk but disabled or never recorded in the state table.
    Inactive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementPlan {
    pub missing: Vec<String>,
    pub to_enable: Vec<String>,
    pub satisfied: Vec<String>,
}

/// Partitions requirements in declaration order. Duplicates and self references are dropped.
pub fn plan_requirements<'a, I>(module: &str, requirements: I) -> RequirementPlan
where
    I: IntoIterator<Item = (&'a str, RequirementState)>,
{
    let mut plan = RequirementPlan::default();
    let mut seen: Vec<&str> = Vec::new();

    for (name, state) in requirements {
        let name = name.trim();
        if name.is_empty() || name == module || seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let bucket = match state {
            RequirementState::Missing => &mut plan.missing,
            RequirementState::Enabled => &mut plan.satisfied,
            RequirementState::Inactive => &mut plan.to_enable,
        };
        bucket.push(name.to_string());
    }

    plan
}
