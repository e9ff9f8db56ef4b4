// src/models/mod.rs
pub mod site;
pub mod location;
pub mod region;
pub mod srst;
pub mod device_pool;
pub mod schedule;
pub mod css;
pub mod sip_trunk;
pub mod route_group;
pub mod app_user;

pub use site::{Site, SiteProfile};
pub use location::{BetweenLocation, Location, RelatedLocation};
pub use region::{Region, RelatedRegion};
pub use srst::Srst;
pub use device_pool::{DevicePool, DevicePoolRouteGroups, LocalRouteGroup};
pub use schedule::{RoutePartition, TimePeriod, TimeSchedule};
pub use css::CallingSearchSpace;
pub use sip_trunk::SipTrunk;
pub use route_group::{RouteGroup, RouteGroupMember};
pub use app_user::AppUser;

use crate::axl::XmlElement;

/// A CUCM object that can be sent in an `add*` request.
pub trait AxlObject {
    /// Element name in the AXL schema (`location`, `sipTrunk`, ...).
    const TAG: &'static str;

    fn name(&self) -> &str;

    fn to_element(&self) -> XmlElement;

    /// `addLocation`, `addSipTrunk`, ...
    fn add_operation() -> String {
        let mut chars = Self::TAG.chars();
        match chars.next() {
            Some(first) => format!("add{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => "add".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_operation_names() {
        assert_eq!(Location::add_operation(), "addLocation");
        assert_eq!(SipTrunk::add_operation(), "addSipTrunk");
        assert_eq!(Srst::add_operation(), "addSrst");
        assert_eq!(CallingSearchSpace::add_operation(), "addCss");
        assert_eq!(RoutePartition::add_operation(), "addRoutePartition");
        assert_eq!(AppUser::add_operation(), "addAppUser");
    }
}
