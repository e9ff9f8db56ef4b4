// src/models/css.rs
use serde::{Deserialize, Serialize};

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallingSearchSpace {
    pub name: String,
    pub description: String,
    /// Partition names in search order.
    pub partitions: Vec<String>,
}

impl CallingSearchSpace {
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Self {
        let partitions = std::iter::once(site.partition_name())
            .chain(profile.css.extra_partitions.iter().cloned())
            .collect();

        Self {
            name: site.css_name(),
            description: format!("{} calling search space", site.name),
            partitions,
        }
    }
}

impl AxlObject for CallingSearchSpace {
    const TAG: &'static str = "css";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        // index is 1-based
        let members = self.partitions.iter().enumerate().map(|(i, partition)| {
            XmlElement::new("member")
                .text_child("routePartitionName", partition.as_str())
                .text_child("index", (i + 1).to_string())
        });

        XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("description", self.description.as_str())
            .child(XmlElement::new("members").children(members))
    }
}
