// src/models/region.rs
use serde::{Deserialize, Serialize};

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub related_regions: Vec<RelatedRegion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedRegion {
    pub region_name: String,
    pub bandwidth: String,
    pub video_bandwidth: i32,
    pub immersive_video_bandwidth: i32,
    pub lossy_network: String,
    pub codec_preference: String,
}

impl Region {
    /// Region with a relationship to every region already on the cluster.
    ///
    /// `existing` comes from `listRegion`; it does not contain the new region.
    pub fn for_site(site: &Site, profile: &SiteProfile, existing: &[String]) -> Self {
        let standards = &profile.region;
        let new_name = site.region_name();

        let related_regions = existing
            .iter()
            .filter(|name| **name != new_name)
            .map(|name| RelatedRegion {
                region_name: name.clone(),
                bandwidth: if profile.is_low_bandwidth_region(name) {
                    standards.low_bandwidth.clone()
                } else {
                    standards.audio_bandwidth.clone()
                },
                video_bandwidth: standards.video_bandwidth,
                immersive_video_bandwidth: standards.immersive_video_bandwidth,
                lossy_network: standards.lossy_network.clone(),
                codec_preference: standards.codec_preference.clone(),
            })
            .collect();

        Self {
            name: new_name,
            related_regions,
        }
    }
}

impl AxlObject for Region {
    const TAG: &'static str = "region";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let related = self.related_regions.iter().map(|r| {
            XmlElement::new("relatedRegion")
                .text_child("regionName", r.region_name.as_str())
                .text_child("bandwidth", r.bandwidth.as_str())
                .text_child("videoBandwidth", r.video_bandwidth.to_string())
                .text_child("lossyNetwork", r.lossy_network.as_str())
                .text_child("codecPreference", r.codec_preference.as_str())
                .text_child(
                    "immersiveVideoBandwidth",
                    r.immersive_video_bandwidth.to_string(),
                )
        });

        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .child(XmlElement::new("relatedRegions").children(related))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_relates_to_all_existing() {
        let site = Site::new("Ottawa", Some("10.1.1.1".parse().unwrap()), None).unwrap();
        let existing = vec![
            "Default".to_string(),
            "G729-Region".to_string(),
            "Toronto-Region".to_string(),
        ];

        let region = Region::for_site(&site, &SiteProfile::default(), &existing);

        assert_eq!(region.name, "Ottawa-Region");
        assert_eq!(region.related_regions.len(), 3);
        assert_eq!(region.related_regions[0].bandwidth, "64 kbps");
        assert_eq!(region.related_regions[1].bandwidth, "8 kbps");
        assert_eq!(region.related_regions[2].video_bandwidth, -2);
    }

    #[test]
    fn test_region_skips_itself_on_rerun() {
        let site = Site::new("Ottawa", Some("10.1.1.1".parse().unwrap()), None).unwrap();
        let existing = vec!["Default".to_string(), "Ottawa-Region".to_string()];

        let region = Region::for_site(&site, &SiteProfile::default(), &existing);
        assert_eq!(region.related_regions.len(), 1);
    }

    #[test]
    fn test_region_element() {
        let site = Site::new("Ottawa", Some("10.1.1.1".parse().unwrap()), None).unwrap();
        let region = Region::for_site(&site, &SiteProfile::default(), &["G729-Region".to_string()]);

        let xml = region.to_element().to_xml().unwrap();
        assert!(xml.contains("<regionName>G729-Region</regionName><bandwidth>8 kbps</bandwidth>"));
        assert!(xml.contains("<codecPreference>Use System Default</codecPreference>"));
        assert!(xml.contains("<immersiveVideoBandwidth>-2</immersiveVideoBandwidth>"));
    }
}
