// src/services/mod.rs
pub mod workflow;
pub mod report;
pub mod provisioner;

pub use workflow::{parse_steps, Plan, ProvisionStep};
pub use report::{ProvisionReport, StepOutcome, StepStatus};
pub use provisioner::{preview_step, ProvisionOptions, SiteProvisioner, StepFailure};
