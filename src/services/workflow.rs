// src/services/workflow.rs
//! Provisioning steps and the order they must run in.
//!
//! Each step's payload names objects created by earlier steps, so a plan is
//! always a topological order of the dependency graph below.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ProvisionError;
use crate::models::Site;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisionStep {
    Location,
    Region,
    Srst,
    DevicePool,
    TimePeriod,
    TimeSchedule,
    Partition,
    #[serde(rename = "css")]
    CallingSearchSpace,
    SipTrunk,
    RouteGroup,
    DevicePoolRouteGroups,
}

impl ProvisionStep {
    /// Every step, in the default run order.
    pub const ALL: [ProvisionStep; 11] = [
        ProvisionStep::Location,
        ProvisionStep::Region,
        ProvisionStep::Srst,
        ProvisionStep::DevicePool,
        ProvisionStep::TimePeriod,
        ProvisionStep::TimeSchedule,
        ProvisionStep::Partition,
        ProvisionStep::CallingSearchSpace,
        ProvisionStep::SipTrunk,
        ProvisionStep::RouteGroup,
        ProvisionStep::DevicePoolRouteGroups,
    ];

    pub fn dependencies(&self) -> &'static [ProvisionStep] {
        use ProvisionStep::*;
        match self {
            Location | Region | Srst | TimePeriod => &[],
            DevicePool => &[Location, Region, Srst],
            TimeSchedule => &[TimePeriod],
            Partition => &[TimeSchedule],
            CallingSearchSpace => &[Partition],
            SipTrunk => &[DevicePool, Location],
            RouteGroup => &[SipTrunk],
            DevicePoolRouteGroups => &[DevicePool, RouteGroup],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProvisionStep::Location => "location",
            ProvisionStep::Region => "region",
            ProvisionStep::Srst => "srst",
            ProvisionStep::DevicePool => "device-pool",
            ProvisionStep::TimePeriod => "time-period",
            ProvisionStep::TimeSchedule => "time-schedule",
            ProvisionStep::Partition => "partition",
            ProvisionStep::CallingSearchSpace => "css",
            ProvisionStep::SipTrunk => "sip-trunk",
            ProvisionStep::RouteGroup => "route-group",
            ProvisionStep::DevicePoolRouteGroups => "device-pool-route-groups",
        }
    }

    /// AXL operation that creates or changes the step's object.
    pub fn operation(&self) -> &'static str {
        match self {
            ProvisionStep::Location => "addLocation",
            ProvisionStep::Region => "addRegion",
            ProvisionStep::Srst => "addSrst",
            ProvisionStep::DevicePool => "addDevicePool",
            ProvisionStep::TimePeriod => "addTimePeriod",
            ProvisionStep::TimeSchedule => "addTimeSchedule",
            ProvisionStep::Partition => "addRoutePartition",
            ProvisionStep::CallingSearchSpace => "addCss",
            ProvisionStep::SipTrunk => "addSipTrunk",
            ProvisionStep::RouteGroup => "addRouteGroup",
            ProvisionStep::DevicePoolRouteGroups => "updateDevicePool",
        }
    }

    /// Name of the object the step creates for `site`.
    pub fn object_name(&self, site: &Site) -> String {
        match self {
            ProvisionStep::Location => site.location_name(),
            ProvisionStep::Region => site.region_name(),
            ProvisionStep::Srst => site.srst_name(),
            ProvisionStep::DevicePool | ProvisionStep::DevicePoolRouteGroups => {
                site.device_pool_name()
            }
            ProvisionStep::TimePeriod => site.time_period_name(),
            ProvisionStep::TimeSchedule => site.time_schedule_name(),
            ProvisionStep::Partition => site.partition_name(),
            ProvisionStep::CallingSearchSpace => site.css_name(),
            ProvisionStep::SipTrunk => site.trunk_name(),
            ProvisionStep::RouteGroup => site.route_group_name(),
        }
    }

    fn rank(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or(usize::MAX)
    }
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProvisionStep {
    type Err = ProvisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ProvisionStep::ALL
            .iter()
            .copied()
            .find(|step| step.name() == wanted)
            .ok_or_else(|| ProvisionError::UnknownStep(s.to_string()))
    }
}

/// Parses a comma separated list such as `location,region,srst`.
pub fn parse_steps(list: &str) -> Result<Vec<ProvisionStep>, ProvisionError> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ProvisionStep::from_str)
        .collect()
}

/// Ordered steps to run for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub steps: Vec<ProvisionStep>,
    /// Dependencies left out of the selection; they must already exist on CUCM.
    pub assumed_existing: Vec<ProvisionStep>,
}

impl Plan {
    /// Every step.
    pub fn full() -> Self {
        Self::for_steps(&ProvisionStep::ALL)
    }

    /// Orders `selected` so that each step runs after its selected
    /// dependencies. Ties keep the default order.
    pub fn for_steps(selected: &[ProvisionStep]) -> Self {
        let wanted: BTreeSet<ProvisionStep> = selected.iter().copied().collect();

        let mut remaining: Vec<ProvisionStep> = wanted.iter().copied().collect();
        remaining.sort_by_key(|s| s.rank());

        let mut steps: Vec<ProvisionStep> = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            // The graph is acyclic, so some step is always ready.
            let ready = remaining
                .iter()
                .position(|step| {
                    step.dependencies()
                        .iter()
                        .all(|dep| !wanted.contains(dep) || steps.contains(dep))
                })
                .unwrap_or(0);
            steps.push(remaining.remove(ready));
        }

        let assumed_existing: BTreeSet<ProvisionStep> = steps
            .iter()
            .flat_map(|step| step.dependencies().iter().copied())
            .filter(|dep| !wanted.contains(dep))
            .collect();

        let mut assumed_existing: Vec<ProvisionStep> = assumed_existing.into_iter().collect();
        assumed_existing.sort_by_key(|s| s.rank());

        Self {
            steps,
            assumed_existing,
        }
    }

    pub fn contains(&self, step: ProvisionStep) -> bool {
        self.steps.contains(&step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Checks the site carries the inputs the plan needs before anything is sent.
    pub fn check_inputs(&self, site: &Site) -> Result<(), ProvisionError> {
        if self.contains(ProvisionStep::Srst) {
            site.srst_ip()?;
        }
        if self.contains(ProvisionStep::SipTrunk) {
            site.gateway_ip()?;
        }
        Ok(())
    }
}
