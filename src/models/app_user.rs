// src/models/app_user.rs
use serde::{Deserialize, Serialize};

use super::AxlObject;
use crate::axl::XmlElement;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppUser {
    pub userid: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub presence_group_name: String,
    pub associated_devices: Vec<String>,
}

// Keeps the password out of logs.
impl std::fmt::Debug for AppUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppUser")
            .field("userid", &self.userid)
            .field("password", &"********")
            .field("presence_group_name", &self.presence_group_name)
            .field("associated_devices", &self.associated_devices)
            .finish()
    }
}

impl AppUser {
    pub fn new(userid: &str, password: &str, presence_group_name: &str) -> Self {
        Self {
            userid: userid.to_string(),
            password: password.to_string(),
            presence_group_name: presence_group_name.to_string(),
            associated_devices: Vec::new(),
        }
    }
}

impl AxlObject for AppUser {
    const TAG: &'static str = "appUser";

    fn name(&self) -> &str {
        &self.userid
    }

    fn to_element(&self) -> XmlElement {
        let devices = self
            .associated_devices
            .iter()
            .map(|d| XmlElement::with_text("device", d.as_str()));

        XmlElement::new(Self::TAG)
            .text_child("userid", self.userid.as_str())
            .text_child("password", self.password.as_str())
            .text_child("presenceGroupName", self.presence_group_name.as_str())
            .child(XmlElement::new("associatedDevices").children(devices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_user_element() {
        let user = AppUser::new("testAppUser", "Cisco1234", "Standard Presence Group");
        let xml = user.to_element().to_xml().unwrap();

        assert_eq!(
            xml,
            "<appUser><userid>testAppUser</userid><password>Cisco1234</password>\
             <presenceGroupName>Standard Presence Group</presenceGroupName>\
             <associatedDevices/></appUser>"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let user = AppUser::new("testAppUser", "Cisco1234", "Standard Presence Group");
        assert!(!format!("{:?}", user).contains("Cisco1234"));
    }
}
