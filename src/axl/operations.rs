//! Operaciones AXL tipadas
//!
//! Proporciona métodos para:
//! - Crear objetos (`add*`) y leer el UUID asignado
//! - Consultar trunks y regiones existentes
//! - Actualizar los grupos de ruta locales del device pool

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use super::client::{AxlError, AxlService};
use super::types::{returned_object, returned_rows, returned_uuid, AxlRequest, AxlResponse};
use super::xml::XmlElement;
use crate::models::{
    AppUser, AxlObject, CallingSearchSpace, DevicePool, DevicePoolRouteGroups, Location, Region,
    RoutePartition, RouteGroup, SipTrunk, Srst, TimePeriod, TimeSchedule,
};

/// Respuesta de una operación que crea o modifica un objeto
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    pub uuid: Uuid,
    /// `{operation}Response` interpretado
    pub response: XmlElement,
    /// Sobre SOAP sin modificar, tal como lo devolvió CUCM
    pub raw: String,
}

impl Created {
    fn from_response(uuid: Uuid, response: AxlResponse) -> Self {
        Self {
            uuid,
            response: response.body,
            raw: response.raw,
        }
    }
}

/// Construye la petición `add*` de cualquier objeto
pub fn add_request<T: AxlObject>(object: &T) -> AxlRequest {
    AxlRequest::add(&T::add_operation(), object.to_element())
}

/// Petición `listRegion` que devuelve solo los nombres
pub fn list_region_request(pattern: &str) -> AxlRequest {
    AxlRequest::new(
        "listRegion",
        vec![
            XmlElement::new("searchCriteria").text_child("name", pattern),
            XmlElement::new("returnedTags").child(XmlElement::new("name")),
        ],
    )
}

#[async_trait]
pub trait AxlOperations: AxlService {
    /// Envía `add{Tag}` y devuelve el UUID creado
    async fn add<T>(&self, object: &T) -> Result<Created, AxlError>
    where
        T: AxlObject + Sync,
    {
        let response = self.execute(add_request(object)).await?;
        let uuid = returned_uuid(&response.body)?;

        info!("AXL object created: {} {} uuid={}", T::TAG, object.name(), uuid);

        Ok(Created::from_response(uuid, response))
    }

    async fn add_location(&self, location: &Location) -> Result<Created, AxlError> {
        self.add(location).await
    }

    async fn add_region(&self, region: &Region) -> Result<Created, AxlError> {
        self.add(region).await
    }

    async fn add_srst(&self, srst: &Srst) -> Result<Created, AxlError> {
        self.add(srst).await
    }

    async fn add_device_pool(&self, device_pool: &DevicePool) -> Result<Created, AxlError> {
        self.add(device_pool).await
    }

    async fn add_time_period(&self, period: &TimePeriod) -> Result<Created, AxlError> {
        self.add(period).await
    }

    async fn add_time_schedule(&self, schedule: &TimeSchedule) -> Result<Created, AxlError> {
        self.add(schedule).await
    }

    async fn add_route_partition(&self, partition: &RoutePartition) -> Result<Created, AxlError> {
        self.add(partition).await
    }

    async fn add_css(&self, css: &CallingSearchSpace) -> Result<Created, AxlError> {
        self.add(css).await
    }

    async fn add_sip_trunk(&self, trunk: &SipTrunk) -> Result<Created, AxlError> {
        self.add(trunk).await
    }

    async fn add_route_group(&self, group: &RouteGroup) -> Result<Created, AxlError> {
        self.add(group).await
    }

    async fn add_app_user(&self, user: &AppUser) -> Result<Created, AxlError> {
        self.add(user).await
    }

    /// Nombres de las regiones que coinciden con `pattern` (`%` = todas)
    async fn list_region(&self, pattern: &str) -> Result<Vec<String>, AxlError> {
        let response = self.execute(list_region_request(pattern)).await?;

        let names: Vec<String> = returned_rows(&response.body, "region")
            .into_iter()
            .filter_map(|row| row.text_of("name").map(str::to_string))
            .collect();

        debug!("AXL listRegion: pattern={}, count={}", pattern, names.len());

        Ok(names)
    }

    /// Nombre canónico de un SIP trunk tal como lo guarda CUCM
    async fn get_sip_trunk(&self, name: &str) -> Result<String, AxlError> {
        let response = self
            .execute(AxlRequest::get_by_name("getSipTrunk", name))
            .await?;

        let trunk = returned_object(&response.body, "sipTrunk")?;
        trunk
            .text_of("name")
            .map(str::to_string)
            .ok_or(AxlError::EmptyResponse)
    }

    /// Apunta los grupos de ruta locales del device pool
    async fn update_device_pool(&self, update: &DevicePoolRouteGroups) -> Result<Created, AxlError> {
        let response = self
            .execute(AxlRequest::new("updateDevicePool", update.to_update_body()))
            .await?;
        let uuid = returned_uuid(&response.body)?;

        info!("AXL device pool updated: {} uuid={}", update.device_pool_name, uuid);

        Ok(Created::from_response(uuid, response))
    }

    /// Versión activa de CUCM; sirve como prueba de conectividad
    async fn get_ccm_version(&self) -> Result<String, AxlError> {
        let response = self.execute(AxlRequest::new("getCCMVersion", Vec::new())).await?;

        response
            .body
            .path(&["return", "componentVersion", "version"])
            .and_then(|v| v.text.clone())
            .ok_or(AxlError::EmptyResponse)
    }
}

impl<S: AxlService + ?Sized> AxlOperations for S {}
