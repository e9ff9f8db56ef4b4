// src/models/device_pool.rs
use serde::{Deserialize, Serialize};

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevicePool {
    pub name: String,
    pub date_time_setting_name: String,
    pub region_name: String,
    pub location_name: String,
    pub srst_name: String,
    pub media_resource_list_name: String,
    pub call_manager_group_name: String,
    pub network_locale: String,
    pub cgpn_transformation_css_name: String,
    pub calling_party_national_prefix: String,
    pub calling_party_international_prefix: String,
    pub calling_party_unknown_prefix: String,
    pub calling_party_subscriber_prefix: String,
    /// Empty on creation; the route group does not exist yet at that point.
    pub local_route_groups: Vec<LocalRouteGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalRouteGroup {
    pub name: String,
    pub value: String,
}

impl DevicePool {
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Self {
        let standards = &profile.device_pool;
        Self {
            name: site.device_pool_name(),
            date_time_setting_name: standards.date_time_group.clone(),
            region_name: site.region_name(),
            location_name: site.location_name(),
            srst_name: site.srst_name(),
            media_resource_list_name: standards.media_resource_list.clone(),
            call_manager_group_name: standards.call_manager_group.clone(),
            network_locale: standards.network_locale.clone(),
            cgpn_transformation_css_name: standards.cgpn_transformation_css.clone(),
            calling_party_national_prefix: standards.national_prefix.clone(),
            calling_party_international_prefix: standards.international_prefix.clone(),
            calling_party_unknown_prefix: standards.unknown_prefix.clone(),
            calling_party_subscriber_prefix: standards.subscriber_prefix.clone(),
            local_route_groups: Vec::new(),
        }
    }
}

fn local_route_group_elements(groups: &[LocalRouteGroup]) -> impl Iterator<Item = XmlElement> + '_ {
    groups.iter().map(|g| {
        XmlElement::new("localRouteGroup")
            .text_child("name", g.name.as_str())
            .text_child("value", g.value.as_str())
    })
}

impl AxlObject for DevicePool {
    const TAG: &'static str = "devicePool";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("dateTimeSettingName", self.date_time_setting_name.as_str())
            .text_child("regionName", self.region_name.as_str())
            .text_child("locationName", self.location_name.as_str())
            .children(local_route_group_elements(&self.local_route_groups))
            .text_child("mediaResourceListName", self.media_resource_list_name.as_str())
            .text_child("srstName", self.srst_name.as_str())
            .text_child("callManagerGroupName", self.call_manager_group_name.as_str())
            .text_child("networkLocale", self.network_locale.as_str())
            .text_child(
                "cgpnTransformationCssName",
                self.cgpn_transformation_css_name.as_str(),
            )
            .text_child(
                "callingPartyNationalPrefix",
                self.calling_party_national_prefix.as_str(),
            )
            .text_child(
                "callingPartyInternationalPrefix",
                self.calling_party_international_prefix.as_str(),
            )
            .text_child(
                "callingPartyUnknownPrefix",
                self.calling_party_unknown_prefix.as_str(),
            )
            .text_child(
                "callingPartySubscriberPrefix",
                self.calling_party_subscriber_prefix.as_str(),
            )
    }
}

/// `updateDevicePool` body that points the pool's local route groups at the
/// site route group and the shared PSTN route group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DevicePoolRouteGroups {
    pub device_pool_name: String,
    pub local_route_groups: Vec<LocalRouteGroup>,
}

impl DevicePoolRouteGroups {
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Self {
        let standards = &profile.device_pool;
        Self {
            device_pool_name: site.device_pool_name(),
            local_route_groups: vec![
                LocalRouteGroup {
                    name: standards.emergency_route_group_label.clone(),
                    value: site.route_group_name(),
                },
                LocalRouteGroup {
                    name: standards.pstn_route_group_label.clone(),
                    value: standards.pstn_route_group.clone(),
                },
            ],
        }
    }

    /// Children of `<ns:updateDevicePool>`.
    pub fn to_update_body(&self) -> Vec<XmlElement> {
        std::iter::once(XmlElement::with_text("name", self.device_pool_name.as_str()))
            .chain(local_route_group_elements(&self.local_route_groups))
            .collect()
    }
}
