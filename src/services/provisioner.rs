// src/services/provisioner.rs
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::axl::{
    add_request, list_region_request, AxlOperations, AxlRequest, AxlService, Created,
};
use crate::error::ProvisionError;
use crate::models::{
    CallingSearchSpace, DevicePool, DevicePoolRouteGroups, Location, Region, RouteGroup,
    RoutePartition, SipTrunk, Site, SiteProfile, Srst, TimePeriod, TimeSchedule,
};
use crate::services::report::{ProvisionReport, StepOutcome, StepStatus};
use crate::services::workflow::{Plan, ProvisionStep};

#[derive(Debug, Clone, Copy, Default)]
pub struct ProvisionOptions {
    /// Stop after the first fault instead of moving on to the next step.
    pub halt_on_fault: bool,
}

/// A step that failed, with the remote operation that failed.
#[derive(Debug)]
pub struct StepFailure {
    pub operation: String,
    pub error: ProvisionError,
}

impl StepFailure {
    fn new(operation: &str, error: impl Into<ProvisionError>) -> Self {
        Self {
            operation: operation.to_string(),
            error: error.into(),
        }
    }
}

pub struct SiteProvisioner<S: ?Sized> {
    axl: Arc<S>,
    profile: SiteProfile,
    options: ProvisionOptions,
}

impl<S: AxlService + ?Sized> SiteProvisioner<S> {
    pub fn new(axl: Arc<S>, profile: SiteProfile) -> Self {
        Self {
            axl,
            profile,
            options: ProvisionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ProvisionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    /// Runs every step of `plan` in order.
    ///
    /// A fault is logged and recorded, then the next step runs. Steps that
    /// depend on a faulted step are still attempted and usually fault too.
    pub async fn provision(&self, site: &Site, plan: &Plan) -> Result<ProvisionReport, ProvisionError> {
        plan.check_inputs(site)?;

        info!(
            "🚀 Provisioning site {} ({} steps)",
            site.name,
            plan.steps.len()
        );
        for step in &plan.assumed_existing {
            info!(
                "Assuming {} already exists: {}",
                step,
                step.object_name(site)
            );
        }

        let mut report = ProvisionReport::new(&site.name, plan.assumed_existing.clone());
        let mut faulted: HashSet<ProvisionStep> = HashSet::new();
        let mut halted = false;

        for &step in &plan.steps {
            let object_name = step.object_name(site);

            if halted {
                report.record(StepOutcome {
                    step,
                    object_name,
                    status: StepStatus::Skipped,
                    operation: step.operation().to_string(),
                    uuid: None,
                    response: None,
                    error: None,
                    error_code: None,
                    duration_ms: 0,
                });
                continue;
            }

            if let Some(dep) = step.dependencies().iter().find(|d| faulted.contains(*d)) {
                warn!(
                    "⚠️  {} depends on {} which faulted; expect {} to fault as well",
                    step,
                    dep,
                    step.operation()
                );
            }

            let started = Instant::now();
            let result = self.run_step(site, step).await;
            let duration_ms = started.elapsed().as_millis() as u64;

            match result {
                Ok(created) => {
                    info!(
                        "✅ {} {}: {} ({}ms)",
                        step.operation(),
                        object_name,
                        created.uuid,
                        duration_ms
                    );
                    report.record(StepOutcome {
                        step,
                        object_name,
                        status: StepStatus::Completed,
                        operation: step.operation().to_string(),
                        uuid: Some(created.uuid),
                        response: Some(created.raw),
                        error: None,
                        error_code: None,
                        duration_ms,
                    });
                }
                Err(failure) => {
                    error!(
                        "❌ Error: {}: {}: {}",
                        failure.operation, object_name, failure.error
                    );
                    faulted.insert(step);
                    report.record(StepOutcome {
                        step,
                        object_name,
                        status: StepStatus::Faulted,
                        operation: failure.operation,
                        uuid: None,
                        response: None,
                        error: Some(failure.error.to_string()),
                        error_code: Some(failure.error.error_code().to_string()),
                        duration_ms,
                    });

                    if self.options.halt_on_fault {
                        warn!("🛑 Halting provisioning of {} after fault in {}", site.name, step);
                        halted = true;
                    }
                }
            }
        }

        report.finish();
        info!("{}", report.summary());

        Ok(report)
    }

    /// Runs one step against CUCM.
    pub async fn run_step(&self, site: &Site, step: ProvisionStep) -> Result<Created, StepFailure> {
        let profile = &self.profile;
        let axl = self.axl.as_ref();
        let op = step.operation();

        match step {
            ProvisionStep::Location => axl
                .add_location(&Location::for_site(site, profile))
                .await
                .map_err(|e| StepFailure::new(op, e)),

            ProvisionStep::Region => {
                let existing = axl
                    .list_region("%")
                    .await
                    .map_err(|e| StepFailure::new("listRegion", e))?;
                axl.add_region(&Region::for_site(site, profile, &existing))
                    .await
                    .map_err(|e| StepFailure::new(op, e))
            }

            ProvisionStep::Srst => {
                let srst = Srst::for_site(site, profile).map_err(|e| StepFailure::new(op, e))?;
                axl.add_srst(&srst).await.map_err(|e| StepFailure::new(op, e))
            }

            ProvisionStep::DevicePool => axl
                .add_device_pool(&DevicePool::for_site(site, profile))
                .await
                .map_err(|e| StepFailure::new(op, e)),

            ProvisionStep::TimePeriod => axl
                .add_time_period(&TimePeriod::for_site(site, profile))
                .await
                .map_err(|e| StepFailure::new(op, e)),

            ProvisionStep::TimeSchedule => axl
                .add_time_schedule(&TimeSchedule::for_site(site))
                .await
                .map_err(|e| StepFailure::new(op, e)),

            ProvisionStep::Partition => axl
                .add_route_partition(&RoutePartition::for_site(site, profile))
                .await
                .map_err(|e| StepFailure::new(op, e)),

            ProvisionStep::CallingSearchSpace => axl
                .add_css(&CallingSearchSpace::for_site(site, profile))
                .await
                .map_err(|e| StepFailure::new(op, e)),

            ProvisionStep::SipTrunk => {
                let trunk = SipTrunk::for_site(site, profile).map_err(|e| StepFailure::new(op, e))?;
                axl.add_sip_trunk(&trunk).await.map_err(|e| StepFailure::new(op, e))
            }

            ProvisionStep::RouteGroup => {
                // Members must use the names CUCM stored, so read the trunks back
                let mut trunk_names = Vec::new();
                for requested in route_group_trunks(site, profile) {
                    let name = axl
                        .get_sip_trunk(&requested)
                        .await
                        .map_err(|e| StepFailure::new("getSipTrunk", e))?;
                    trunk_names.push(name);
                }
                axl.add_route_group(&RouteGroup::for_site(site, profile, &trunk_names))
                    .await
                    .map_err(|e| StepFailure::new(op, e))
            }

            ProvisionStep::DevicePoolRouteGroups => axl
                .update_device_pool(&DevicePoolRouteGroups::for_site(site, profile))
                .await
                .map_err(|e| StepFailure::new(op, e)),
        }
    }
}

/// Requests a step would send, without sending them.
///
/// Lookups are shown as requests; payloads that depend on their results
/// are built as if the lookups returned nothing new (no existing regions,
/// trunk names exactly as requested).
pub fn preview_step(
    site: &Site,
    profile: &SiteProfile,
    step: ProvisionStep,
) -> Result<Vec<AxlRequest>, ProvisionError> {
    let requests = match step {
        ProvisionStep::Location => vec![add_request(&Location::for_site(site, profile))],
        ProvisionStep::Region => vec![
            list_region_request("%"),
            add_request(&Region::for_site(site, profile, &[])),
        ],
        ProvisionStep::Srst => vec![add_request(&Srst::for_site(site, profile)?)],
        ProvisionStep::DevicePool => vec![add_request(&DevicePool::for_site(site, profile))],
        ProvisionStep::TimePeriod => vec![add_request(&TimePeriod::for_site(site, profile))],
        ProvisionStep::TimeSchedule => vec![add_request(&TimeSchedule::for_site(site))],
        ProvisionStep::Partition => vec![add_request(&RoutePartition::for_site(site, profile))],
        ProvisionStep::CallingSearchSpace => {
            vec![add_request(&CallingSearchSpace::for_site(site, profile))]
        }
        ProvisionStep::SipTrunk => vec![add_request(&SipTrunk::for_site(site, profile)?)],
        ProvisionStep::RouteGroup => {
            let trunks = route_group_trunks(site, profile);
            let mut requests: Vec<AxlRequest> = trunks
                .iter()
                .map(|t| AxlRequest::get_by_name("getSipTrunk", t))
                .collect();
            requests.push(add_request(&RouteGroup::for_site(site, profile, &trunks)));
            requests
        }
        ProvisionStep::DevicePoolRouteGroups => vec![AxlRequest::new(
            "updateDevicePool",
            DevicePoolRouteGroups::for_site(site, profile).to_update_body(),
        )],
    };

    Ok(requests)
}

/// Site gateway trunk first, then the shared secondary trunk if any.
fn route_group_trunks(site: &Site, profile: &SiteProfile) -> Vec<String> {
    std::iter::once(site.trunk_name())
        .chain(profile.route_group.secondary_trunk.clone())
        .collect()
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.operation, self.error)
    }
}
