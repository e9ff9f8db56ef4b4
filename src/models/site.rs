// src/models/site.rs
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;

use crate::error::ProvisionError;

/// A branch being provisioned. Every object name derives from `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    pub name: String,
    pub srst_ip: Option<IpAddr>,
    pub gateway_ip: Option<IpAddr>,
}

impl Site {
    pub fn new(
        name: &str,
        srst_ip: Option<IpAddr>,
        gateway_ip: Option<IpAddr>,
    ) -> Result<Self, ProvisionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProvisionError::InvalidRequest("site name is empty".to_string()));
        }
        if name.chars().any(|c| c.is_whitespace()) {
            return Err(ProvisionError::InvalidRequest(format!(
                "site name must not contain whitespace: {:?}",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            srst_ip,
            gateway_ip,
        })
    }

    pub fn srst_ip(&self) -> Result<IpAddr, ProvisionError> {
        self.srst_ip.ok_or_else(|| {
            ProvisionError::InvalidRequest(format!("site {} has no SRST address", self.name))
        })
    }

    /// Falls back to the SRST address: the branch gateway also runs SRST.
    pub fn gateway_ip(&self) -> Result<IpAddr, ProvisionError> {
        self.gateway_ip.or(self.srst_ip).ok_or_else(|| {
            ProvisionError::InvalidRequest(format!("site {} has no gateway address", self.name))
        })
    }

    pub fn location_name(&self) -> String {
        format!("{}-Loc", self.name)
    }

    pub fn region_name(&self) -> String {
        format!("{}-Region", self.name)
    }

    pub fn srst_name(&self) -> String {
        format!("{}-SRST", self.name)
    }

    pub fn device_pool_name(&self) -> String {
        format!("{}-DP", self.name)
    }

    pub fn trunk_name(&self) -> String {
        format!("{}-GW", self.name)
    }

    pub fn route_group_name(&self) -> String {
        format!("{}-RG", self.name)
    }

    pub fn time_period_name(&self) -> String {
        format!("{}-BusinessHours-TP", self.name)
    }

    pub fn time_schedule_name(&self) -> String {
        format!("{}-BusinessHours-TS", self.name)
    }

    pub fn partition_name(&self) -> String {
        format!("{}-BusinessHours-PT", self.name)
    }

    pub fn css_name(&self) -> String {
        format!("{}-CSS", self.name)
    }
}

// ==================== Environment standards ====================

/// Standards shared by every site in the cluster.
///
/// Defaults are the values found on the production cluster; a JSON file can
/// override any subset of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SiteProfile {
    pub location: LocationStandards,
    pub region: RegionStandards,
    pub srst: SrstStandards,
    pub device_pool: DevicePoolStandards,
    pub trunk: TrunkStandards,
    pub route_group: RouteGroupStandards,
    pub schedule: ScheduleStandards,
    pub css: CssStandards,
    pub app_user: AppUserStandards,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LocationStandards {
    pub hub_location: String,
    pub rsvp_setting: String,
    pub within_audio_bandwidth: u32,
    pub within_video_bandwidth: u32,
    pub within_immersive_kbits: u32,
    pub between_weight: u32,
    pub between_audio_bandwidth: u32,
    pub between_video_bandwidth: u32,
    pub between_immersive_bandwidth: u32,
}

impl Default for LocationStandards {
    fn default() -> Self {
        Self {
            hub_location: "Hub_None".to_string(),
            rsvp_setting: "Use System Default".to_string(),
            within_audio_bandwidth: 0,
            within_video_bandwidth: 0,
            within_immersive_kbits: 0,
            between_weight: 50,
            between_audio_bandwidth: 0,
            between_video_bandwidth: 384,
            between_immersive_bandwidth: 384,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RegionStandards {
    pub audio_bandwidth: String,
    /// Related regions listed here get `low_bandwidth` instead.
    pub low_bandwidth_regions: Vec<String>,
    pub low_bandwidth: String,
    pub video_bandwidth: i32,
    pub immersive_video_bandwidth: i32,
    pub lossy_network: String,
    pub codec_preference: String,
}

impl Default for RegionStandards {
    fn default() -> Self {
        Self {
            audio_bandwidth: "64 kbps".to_string(),
            low_bandwidth_regions: vec!["G729-Region".to_string()],
            low_bandwidth: "8 kbps".to_string(),
            video_bandwidth: -2,
            immersive_video_bandwidth: -2,
            lossy_network: "Use System Default".to_string(),
            codec_preference: "Use System Default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SrstStandards {
    pub port: u16,
    pub sip_port: u16,
    pub certificate_port: u16,
    pub secure: bool,
}

impl Default for SrstStandards {
    fn default() -> Self {
        Self {
            port: 2000,
            sip_port: 5060,
            certificate_port: 2445,
            secure: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DevicePoolStandards {
    pub date_time_group: String,
    pub media_resource_list: String,
    pub call_manager_group: String,
    pub network_locale: String,
    pub cgpn_transformation_css: String,
    pub national_prefix: String,
    pub international_prefix: String,
    pub unknown_prefix: String,
    pub subscriber_prefix: String,
    /// Local route group label pointing at the site's own route group.
    pub emergency_route_group_label: String,
    pub pstn_route_group_label: String,
    pub pstn_route_group: String,
}

impl Default for DevicePoolStandards {
    fn default() -> Self {
        Self {
            date_time_group: "CMLocal".to_string(),
            media_resource_list: "Hub-MRGL".to_string(),
            call_manager_group: "Residence-CMG".to_string(),
            network_locale: String::new(),
            cgpn_transformation_css: "Incoming-ANI-E164-CSS".to_string(),
            national_prefix: "+1".to_string(),
            international_prefix: "+".to_string(),
            unknown_prefix: "Default".to_string(),
            subscriber_prefix: "+1".to_string(),
            emergency_route_group_label: "911 Primary".to_string(),
            pstn_route_group_label: "PSTN Primary".to_string(),
            pstn_route_group: "Centralized-SIP-Trunk-RG".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrunkStandards {
    pub sip_profile: String,
    pub security_profile: String,
    pub presence_group: String,
    pub calling_search_space: Option<String>,
    pub destination_port: u16,
}

impl Default for TrunkStandards {
    fn default() -> Self {
        Self {
            sip_profile: "Standard SIP Profile".to_string(),
            security_profile: "Non Secure SIP Trunk Profile".to_string(),
            presence_group: "Standard Presence group".to_string(),
            calling_search_space: None,
            destination_port: 5060,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RouteGroupStandards {
    pub distribution_algorithm: String,
    /// Second member after the site's own gateway trunk.
    pub secondary_trunk: Option<String>,
}

impl Default for RouteGroupStandards {
    fn default() -> Self {
        Self {
            distribution_algorithm: "Top Down".to_string(),
            secondary_trunk: Some("Markham-GW-Trunk".to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleStandards {
    pub start_time: String,
    pub end_time: String,
    pub start_day: String,
    pub end_day: String,
    /// `None` means the partition follows the originating device time zone.
    pub time_zone: Option<String>,
}

impl Default for ScheduleStandards {
    fn default() -> Self {
        Self {
            start_time: "08:00".to_string(),
            end_time: "17:00".to_string(),
            start_day: "Mon".to_string(),
            end_day: "Fri".to_string(),
            time_zone: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CssStandards {
    /// Partitions appended after the site partition, in order.
    pub extra_partitions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppUserStandards {
    pub presence_group: String,
}

impl Default for AppUserStandards {
    fn default() -> Self {
        Self {
            presence_group: "Standard Presence Group".to_string(),
        }
    }
}

impl SiteProfile {
    pub fn from_json(json: &str) -> Result<Self, ProvisionError> {
        serde_json::from_str(json).map_err(|e| ProvisionError::Profile(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self, ProvisionError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ProvisionError::Profile(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn is_low_bandwidth_region(&self, region: &str) -> bool {
        self.region
            .low_bandwidth_regions
            .iter()
            .any(|r| r == region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_site_names() {
        let site = Site::new("Ottawa", Some(ip("10.1.1.1")), None).unwrap();

        assert_eq!(site.location_name(), "Ottawa-Loc");
        assert_eq!(site.region_name(), "Ottawa-Region");
        assert_eq!(site.srst_name(), "Ottawa-SRST");
        assert_eq!(site.device_pool_name(), "Ottawa-DP");
        assert_eq!(site.trunk_name(), "Ottawa-GW");
        assert_eq!(site.route_group_name(), "Ottawa-RG");
        assert_eq!(site.gateway_ip().unwrap(), ip("10.1.1.1"));
    }

    #[test]
    fn test_site_addresses() {
        let site = Site::new("Ottawa", Some(ip("10.1.1.1")), Some(ip("10.1.1.2"))).unwrap();
        assert_eq!(site.srst_ip().unwrap(), ip("10.1.1.1"));
        assert_eq!(site.gateway_ip().unwrap(), ip("10.1.1.2"));

        let bare = Site::new("Ottawa", None, None).unwrap();
        assert!(bare.srst_ip().is_err());
        assert!(bare.gateway_ip().is_err());
    }

    #[test]
    fn test_site_rejects_bad_names() {
        assert!(Site::new("  ", None, None).is_err());
        assert!(Site::new("New York", None, None).is_err());
    }

    #[test]
    fn test_profile_partial_override() {
        let profile = SiteProfile::from_json(
            r#"{
                "device_pool": { "date_time_group": "CMLocal-Eastern" },
                "route_group": { "secondary_trunk": null }
            }"#,
        )
        .unwrap();

        assert_eq!(profile.device_pool.date_time_group, "CMLocal-Eastern");
        assert_eq!(profile.device_pool.media_resource_list, "Hub-MRGL");
        assert_eq!(profile.route_group.secondary_trunk, None);
        assert_eq!(profile.location.between_video_bandwidth, 384);
    }

    #[test]
    fn test_profile_rejects_unknown_fields() {
        let err = SiteProfile::from_json(r#"{ "device_pol": {} }"#).unwrap_err();
        assert!(matches!(err, ProvisionError::Profile(_)));
    }

    #[test]
    fn test_profile_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "css": {{ "extra_partitions": ["Global-PT"] }} }}"#).unwrap();

        let profile = SiteProfile::from_file(file.path()).unwrap();
        assert_eq!(profile.css.extra_partitions, vec!["Global-PT".to_string()]);
        assert!(profile.is_low_bandwidth_region("G729-Region"));
        assert!(!profile.is_low_bandwidth_region("Default"));
    }
}
