// src/models/location.rs
use serde::{Deserialize, Serialize};

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub name: String,
    pub within_audio_bandwidth: u32,
    pub within_video_bandwidth: u32,
    pub within_immersive_kbits: u32,
    pub related_locations: Vec<RelatedLocation>,
    pub between_locations: Vec<BetweenLocation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedLocation {
    pub location_name: String,
    pub rsvp_setting: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BetweenLocation {
    pub location_name: String,
    pub weight: u32,
    pub audio_bandwidth: u32,
    pub video_bandwidth: u32,
    pub immersive_bandwidth: u32,
}

impl Location {
    /// Branch location linked to the hub, as every other site is.
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Self {
        let standards = &profile.location;
        Self {
            name: site.location_name(),
            within_audio_bandwidth: standards.within_audio_bandwidth,
            within_video_bandwidth: standards.within_video_bandwidth,
            within_immersive_kbits: standards.within_immersive_kbits,
            related_locations: vec![RelatedLocation {
                location_name: standards.hub_location.clone(),
                rsvp_setting: standards.rsvp_setting.clone(),
            }],
            between_locations: vec![BetweenLocation {
                location_name: standards.hub_location.clone(),
                weight: standards.between_weight,
                audio_bandwidth: standards.between_audio_bandwidth,
                video_bandwidth: standards.between_video_bandwidth,
                immersive_bandwidth: standards.between_immersive_bandwidth,
            }],
        }
    }
}

impl AxlObject for Location {
    const TAG: &'static str = "location";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let related = self.related_locations.iter().map(|r| {
            XmlElement::new("relatedLocation")
                .text_child("locationName", r.location_name.as_str())
                .text_child("rsvpSetting", r.rsvp_setting.as_str())
        });

        let between = self.between_locations.iter().map(|b| {
            XmlElement::new("betweenLocation")
                .text_child("locationName", b.location_name.as_str())
                .text_child("weight", b.weight.to_string())
                .text_child("audioBandwidth", b.audio_bandwidth.to_string())
                .text_child("videoBandwidth", b.video_bandwidth.to_string())
                .text_child("immersiveBandwidth", b.immersive_bandwidth.to_string())
        });

        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .child(XmlElement::new("relatedLocations").children(related))
            .text_child("withinAudioBandwidth", self.within_audio_bandwidth.to_string())
            .text_child("withinVideoBandwidth", self.within_video_bandwidth.to_string())
            .text_child("withinImmersiveKbits", self.within_immersive_kbits.to_string())
            .child(XmlElement::new("betweenLocations").children(between))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_for_site() {
        let site = Site::new("Ottawa", Some("10.1.1.1".parse().unwrap()), None).unwrap();
        let location = Location::for_site(&site, &SiteProfile::default());

        assert_eq!(location.name, "Ottawa-Loc");
        assert_eq!(location.related_locations[0].location_name, "Hub_None");

        let element = location.to_element();
        let between = element
            .path(&["betweenLocations", "betweenLocation"])
            .unwrap();
        assert_eq!(between.text_of("weight"), Some("50"));
        assert_eq!(between.text_of("audioBandwidth"), Some("0"));
        assert_eq!(between.text_of("videoBandwidth"), Some("384"));
        assert_eq!(between.text_of("immersiveBandwidth"), Some("384"));
        assert_eq!(
            element
                .path(&["relatedLocations", "relatedLocation"])
                .and_then(|r| r.text_of("rsvpSetting")),
            Some("Use System Default")
        );
        assert_eq!(element.text_of("withinAudioBandwidth"), Some("0"));
    }
}
