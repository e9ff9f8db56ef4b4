//! Tipos de datos para la API AXL
//!
//! Petición genérica, fallo SOAP y utilidades para leer las respuestas
//! `add*`/`get*`/`list*` según la documentación de Cisco.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use super::client::AxlError;
use super::xml::XmlElement;

// ============================================================================
// Request / Fault
// ============================================================================

/// Petición AXL: operación y los hijos de `<ns:{operation}>`
#[derive(Debug, Clone, PartialEq)]
pub struct AxlRequest {
    pub operation: String,
    pub body: Vec<XmlElement>,
}

impl AxlRequest {
    pub fn new(operation: impl Into<String>, body: Vec<XmlElement>) -> Self {
        Self {
            operation: operation.into(),
            body,
        }
    }

    /// Petición `add*` con un único objeto como cuerpo
    pub fn add(operation: &str, object: XmlElement) -> Self {
        Self::new(operation, vec![object])
    }

    /// Petición `get*` por nombre
    pub fn get_by_name(operation: &str, name: &str) -> Self {
        Self::new(operation, vec![XmlElement::with_text("name", name)])
    }
}

/// SOAP Fault devuelto por CUCM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AxlFault {
    pub fault_code: Option<String>,
    pub message: String,
    pub axl_code: Option<i64>,
    pub detail: Option<String>,
}

impl fmt::Display for AxlFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.axl_code {
            Some(code) => write!(f, "{} (axlcode {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

/// Respuesta AXL: `{operation}Response` ya interpretado y el sobre recibido
#[derive(Debug, Clone, PartialEq)]
pub struct AxlResponse {
    pub body: XmlElement,
    /// Sobre SOAP tal como llegó del servidor
    pub raw: String,
}

impl AxlResponse {
    pub fn new(body: XmlElement, raw: impl Into<String>) -> Self {
        Self {
            body,
            raw: raw.into(),
        }
    }
}

/// Respuesta sin sobre original; el texto crudo es el propio elemento
impl From<XmlElement> for AxlResponse {
    fn from(body: XmlElement) -> Self {
        let raw = body.to_string();
        Self { body, raw }
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Parsea un identificador AXL como `{1B1B9EB6-7803-11D3-BDF0-00108302EAD1}`
pub fn parse_axl_uuid(raw: &str) -> Result<Uuid, AxlError> {
    let trimmed = raw.trim().trim_start_matches('{').trim_end_matches('}');
    Uuid::parse_str(trimmed).map_err(|_| AxlError::InvalidIdentifier(raw.to_string()))
}

/// Formatea un UUID al estilo AXL (mayúsculas entre llaves)
pub fn format_axl_uuid(uuid: &Uuid) -> String {
    format!("{{{}}}", uuid.hyphenated().to_string().to_uppercase())
}

/// Lee `<return>{UUID}</return>` de una respuesta `add*`/`update*`
pub fn returned_uuid(response: &XmlElement) -> Result<Uuid, AxlError> {
    let raw = response.text_of("return").ok_or(AxlError::EmptyResponse)?;
    parse_axl_uuid(raw)
}

/// Lee `<return><{tag}>...</{tag}></return>` de una respuesta `get*`
pub fn returned_object<'a>(response: &'a XmlElement, tag: &str) -> Result<&'a XmlElement, AxlError> {
    response
        .path(&["return", tag])
        .ok_or(AxlError::EmptyResponse)
}

/// Lee todas las filas `<return><{tag}/>...</return>` de una respuesta `list*`
pub fn returned_rows<'a>(response: &'a XmlElement, tag: &'a str) -> Vec<&'a XmlElement> {
    response
        .find("return")
        .map(|ret| ret.find_all(tag).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_axl_uuid() {
        let uuid = parse_axl_uuid("{1B1B9EB6-7803-11D3-BDF0-00108302EAD1}").unwrap();
        assert_eq!(
            format_axl_uuid(&uuid),
            "{1B1B9EB6-7803-11D3-BDF0-00108302EAD1}"
        );

        assert!(parse_axl_uuid("1b1b9eb6-7803-11d3-bdf0-00108302ead1").is_ok());
        assert!(matches!(
            parse_axl_uuid("{not-a-uuid}"),
            Err(AxlError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_returned_rows_empty_list() {
        let response = XmlElement::new("listRegionResponse").child(XmlElement::new("return"));
        assert!(returned_rows(&response, "region").is_empty());

        let missing = XmlElement::new("listRegionResponse");
        assert!(returned_rows(&missing, "region").is_empty());
    }

    #[test]
    fn test_returned_object() {
        let response = XmlElement::new("getSipTrunkResponse").child(
            XmlElement::new("return")
                .child(XmlElement::new("sipTrunk").text_child("name", "Ottawa-GW")),
        );

        let trunk = returned_object(&response, "sipTrunk").unwrap();
        assert_eq!(trunk.text_of("name"), Some("Ottawa-GW"));
        assert!(returned_object(&response, "routeGroup").is_err());
    }

    #[test]
    fn test_fault_display() {
        let fault = AxlFault {
            fault_code: None,
            message: "Item not valid: The specified Region was not found".to_string(),
            axl_code: Some(5007),
            detail: None,
        };
        assert_eq!(
            fault.to_string(),
            "Item not valid: The specified Region was not found (axlcode 5007)"
        );
    }
}
