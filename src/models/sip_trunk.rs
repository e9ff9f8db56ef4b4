// src/models/sip_trunk.rs
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;
use crate::error::ProvisionError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SipTrunk {
    pub name: String,
    pub description: String,
    pub device_pool_name: String,
    pub location_name: String,
    pub security_profile_name: String,
    pub sip_profile_name: String,
    pub presence_group_name: String,
    pub calling_search_space_name: Option<String>,
    pub destination: IpAddr,
    pub destination_port: u16,
}

impl SipTrunk {
    /// Trunk to the branch gateway, homed in the site's device pool.
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Result<Self, ProvisionError> {
        let standards = &profile.trunk;
        Ok(Self {
            name: site.trunk_name(),
            description: format!("{} gateway", site.name),
            device_pool_name: site.device_pool_name(),
            location_name: site.location_name(),
            security_profile_name: standards.security_profile.clone(),
            sip_profile_name: standards.sip_profile.clone(),
            presence_group_name: standards.presence_group.clone(),
            calling_search_space_name: standards.calling_search_space.clone(),
            destination: site.gateway_ip()?,
            destination_port: standards.destination_port,
        })
    }
}

impl AxlObject for SipTrunk {
    const TAG: &'static str = "sipTrunk";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let address = match self.destination {
            IpAddr::V4(v4) => XmlElement::with_text("addressIpv4", v4.to_string()),
            IpAddr::V6(v6) => XmlElement::with_text("addressIpv6", v6.to_string()),
        };

        let destination = XmlElement::new("destination")
            .child(address)
            .text_child("port", self.destination_port.to_string())
            .text_child("sortOrder", "1");

        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("description", self.description.as_str())
            .text_child("product", "SIP Trunk")
            .text_child("class", "Trunk")
            .text_child("protocol", "SIP")
            .text_child("protocolSide", "Network")
            .opt_text_child(
                "callingSearchSpaceName",
                self.calling_search_space_name.as_deref(),
            )
            .text_child("devicePoolName", self.device_pool_name.as_str())
            .text_child("locationName", self.location_name.as_str())
            .text_child("securityProfileName", self.security_profile_name.as_str())
            .text_child("sipProfileName", self.sip_profile_name.as_str())
            .text_child("presenceGroupName", self.presence_group_name.as_str())
            .child(XmlElement::new("destinations").child(destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trunk_for_site() {
        let site = Site::new(
            "Ottawa",
            Some("10.1.1.1".parse().unwrap()),
            Some("10.1.1.2".parse().unwrap()),
        )
        .unwrap();
        let element = SipTrunk::for_site(&site, &SiteProfile::default())
            .unwrap()
            .to_element();

        assert_eq!(element.text_of("name"), Some("Ottawa-GW"));
        assert_eq!(element.text_of("devicePoolName"), Some("Ottawa-DP"));
        assert_eq!(element.text_of("locationName"), Some("Ottawa-Loc"));
        assert!(element.find("callingSearchSpaceName").is_none());

        let destination = element.path(&["destinations", "destination"]).unwrap();
        assert_eq!(destination.text_of("addressIpv4"), Some("10.1.1.2"));
        assert_eq!(destination.text_of("port"), Some("5060"));
    }
}
