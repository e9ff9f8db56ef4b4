// src/models/schedule.rs
//! Time period, time schedule and the partition that uses the schedule.
//! They must be created in that order.

use serde::{Deserialize, Serialize};

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimePeriod {
    pub name: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub start_day: String,
    pub end_day: String,
}

impl TimePeriod {
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Self {
        let standards = &profile.schedule;
        Self {
            name: site.time_period_name(),
            description: format!("{} business hours", site.name),
            start_time: standards.start_time.clone(),
            end_time: standards.end_time.clone(),
            start_day: standards.start_day.clone(),
            end_day: standards.end_day.clone(),
        }
    }
}

impl AxlObject for TimePeriod {
    const TAG: &'static str = "timePeriod";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("startTime", self.start_time.as_str())
            .text_child("endTime", self.end_time.as_str())
            .text_child("startDay", self.start_day.as_str())
            .text_child("endDay", self.end_day.as_str())
            .text_child("monthOfYear", "None")
            .text_child("dayOfMonth", "0")
            .text_child("description", self.description.as_str())
            .text_child("isPublished", "false")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSchedule {
    pub name: String,
    pub description: String,
    pub time_period_names: Vec<String>,
}

impl TimeSchedule {
    pub fn for_site(site: &Site) -> Self {
        Self {
            name: site.time_schedule_name(),
            description: format!("{} business hours", site.name),
            time_period_names: vec![site.time_period_name()],
        }
    }
}

impl AxlObject for TimeSchedule {
    const TAG: &'static str = "timeSchedule";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let members = self
            .time_period_names
            .iter()
            .map(|p| XmlElement::new("member").text_child("timePeriodName", p.as_str()));

        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("description", self.description.as_str())
            .child(XmlElement::new("members").children(members))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutePartition {
    pub name: String,
    pub description: String,
    pub time_schedule_name: Option<String>,
    pub time_zone: Option<String>,
}

impl RoutePartition {
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Self {
        Self {
            name: site.partition_name(),
            description: format!("{} business hours", site.name),
            time_schedule_name: Some(site.time_schedule_name()),
            time_zone: profile.schedule.time_zone.clone(),
        }
    }
}

impl AxlObject for RoutePartition {
    const TAG: &'static str = "routePartition";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let element = XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("description", self.description.as_str())
            .opt_text_child("timeScheduleIdName", self.time_schedule_name.as_deref());

        match &self.time_zone {
            Some(tz) => element
                .text_child("useOriginatingDeviceTimeZone", "false")
                .text_child("timeZone", tz.as_str()),
            None => element.text_child("useOriginatingDeviceTimeZone", "true"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site::new("Ottawa", Some("10.1.1.1".parse().unwrap()), None).unwrap()
    }

    #[test]
    fn test_schedule_chain_names() {
        let profile = SiteProfile::default();
        let period = TimePeriod::for_site(&site(), &profile);
        let schedule = TimeSchedule::for_site(&site());
        let partition = RoutePartition::for_site(&site(), &profile);

        assert_eq!(schedule.time_period_names, vec![period.name.clone()]);
        assert_eq!(partition.time_schedule_name.as_deref(), Some(schedule.name.as_str()));

        let element = period.to_element();
        assert_eq!(element.text_of("startTime"), Some("08:00"));
        assert_eq!(element.text_of("endDay"), Some("Fri"));
    }

    #[test]
    fn test_partition_time_zone() {
        let element = RoutePartition::for_site(&site(), &SiteProfile::default()).to_element();
        assert_eq!(element.text_of("useOriginatingDeviceTimeZone"), Some("true"));
        assert!(element.find("timeZone").is_none());

        let mut profile = SiteProfile::default();
        profile.schedule.time_zone = Some("America/Toronto".to_string());
        let element = RoutePartition::for_site(&site(), &profile).to_element();
        assert_eq!(element.text_of("useOriginatingDeviceTimeZone"), Some("false"));
        assert_eq!(element.text_of("timeZone"), Some("America/Toronto"));
        assert_eq!(
            element.text_of("timeScheduleIdName"),
            Some("Ottawa-BusinessHours-TS")
        );
    }
}
