// src/models/srst.rs
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::{AxlObject, Site, SiteProfile};
use crate::axl::XmlElement;
use crate::error::ProvisionError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Srst {
    pub name: String,
    pub port: u16,
    pub ip_address: IpAddr,
    pub sip_network: IpAddr,
    pub sip_port: u16,
    pub certificate_port: u16,
    pub is_secure: bool,
}

impl Srst {
    pub fn for_site(site: &Site, profile: &SiteProfile) -> Result<Self, ProvisionError> {
        let ip = site.srst_ip()?;
        Ok(Self {
            name: site.srst_name(),
            port: profile.srst.port,
            ip_address: ip,
            sip_network: ip,
            sip_port: profile.srst.sip_port,
            certificate_port: profile.srst.certificate_port,
            is_secure: profile.srst.secure,
        })
    }
}

impl AxlObject for Srst {
    const TAG: &'static str = "srst";

    fn name(&self) -> &str {
        &self.name
    }

    fn to_element(&self) -> XmlElement {
        let element = XmlElement::new(Self::TAG)
            .text_child("name", self.name.as_str())
            .text_child("port", self.port.to_string());

        // SRST reference takes the address family in separate fields
        let element = match self.ip_address {
            IpAddr::V4(v4) => element.text_child("ipAddress", v4.to_string()),
            IpAddr::V6(v6) => element.text_child("ipv6Address", v6.to_string()),
        };

        element
            .text_child("SipNetwork", self.sip_network.to_string())
            .text_child("SipPort", self.sip_port.to_string())
            .text_child("srstCertificatePort", self.certificate_port.to_string())
            .text_child("isSecure", self.is_secure.to_string())
    }
}
