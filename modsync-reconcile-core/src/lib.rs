pub mod decision;
pub mod policy;
pub mod requirements;
pub mod shared;

pub use decision::{Decision, Effect, Observed, TransitionPlan, decide};
pub use policy::{Resolution, SyncPolicy};
pub use requirements::{RequirementPlan, RequirementState, plan_requirements};
pub use shared::{declared_packages, removable_packages};
