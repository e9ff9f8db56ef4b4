// src/models/route_group.rs
use serde::{Deserialize, Serialize};

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteGroup {
    pub name: String,
    pub distribution_algorithm: String,
    pub members: Vec<RouteGroupMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RouteGroupMember {
    pub device_name: String,
    pub device_selection_order: u32,
    pub port: u32,
}

impl RouteGroup {
    /// `trunk_names` are the canonical names read back from `getSipTrunk`,
    /// in selection order.
    pub fn for_site(site: &Site, profile: &SiteProfile, trunk_names: &[String]) -> Self {
        let members = trunk_names
            .iter()
            .enumerate()
            .map(|(i, name)| RouteGroupMember {
                device_name: name.clone(),
                device_selection_order: (i + 1) as u32,
                port: 0,
            })
            .collect();

        Self {
            name: site.route_group_name(),
            distribution_algorithm: profile.route_group.distribution_algorithm.clone(),
            members,
        }
    }
}

impl AxlObject for RouteGroup {
    const TAG: &'static str = "routeGroup";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let members = self.members.iter().map(|m| {
            XmlElement::new("member")
                .text_child("deviceName", m.device_name.as_str())
                .text_child("deviceSelectionOrder", m.device_selection_order.to_string())
                .text_child("port", m.port.to_string())
        });

        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("distributionAlgorithm", self.distribution_algorithm.as_str())
            .child(XmlElement::new("members").children(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_group_members() {
        let site = Site::new("Ottawa", Some("10.1.1.1".parse().unwrap()), None).unwrap();
        let group = RouteGroup::for_site(
            &site,
            &SiteProfile::default(),
            &["Ottawa-GW".to_string(), "Markham-GW-Trunk".to_string()],
        );

        assert_eq!(group.name, "Ottawa-RG");
        assert_eq!(group.distribution_algorithm, "Top Down");
        assert_eq!(group.members[0].device_selection_order, 1);
        assert_eq!(group.members[1].device_name, "Markham-GW-Trunk");
        assert_eq!(group.members[1].device_selection_order, 2);

        let xml = group.to_element().to_xml().unwrap();
        assert!(xml.contains(
            "<member><deviceName>Ottawa-GW</deviceName><deviceSelectionOrder>1</deviceSelectionOrder><port>0</port></member>"
        ));
    }
}
