//! Construcción y lectura de sobres SOAP para AXL

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;

use super::client::AxlError;
use super::types::{AxlFault, AxlRequest};
use super::xml::XmlElement;

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Namespace AXL para una versión de esquema (ej: "12.5")
pub fn axl_namespace(version: &str) -> String {
    format!("http://www.cisco.com/AXL/API/{}", version)
}

/// Valor de la cabecera SOAPAction que exige CUCM
pub fn soap_action(version: &str, operation: &str) -> String {
    format!("\"CUCM:DB ver={} {}\"", version, operation)
}

/// Serializa una petición dentro del sobre SOAP
///
/// Los hijos del cuerpo van sin prefijo: el esquema AXL es
/// `elementFormDefault="unqualified"`.
pub fn build_envelope(version: &str, request: &AxlRequest) -> Result<String, AxlError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let namespace = axl_namespace(version);
    let mut envelope = BytesStart::new("soapenv:Envelope");
    envelope.push_attribute(("xmlns:soapenv", SOAP_ENV_NS));
    envelope.push_attribute(("xmlns:ns", namespace.as_str()));
    writer.write_event(Event::Start(envelope)).map_err(xml_err)?;

    writer
        .write_event(Event::Empty(BytesStart::new("soapenv:Header")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("soapenv:Body")))
        .map_err(xml_err)?;

    let operation_tag = format!("ns:{}", request.operation);
    writer
        .write_event(Event::Start(BytesStart::new(operation_tag.as_str())))
        .map_err(xml_err)?;
    for element in &request.body {
        element.write(&mut writer)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(operation_tag.as_str())))
        .map_err(xml_err)?;

    writer
        .write_event(Event::End(BytesEnd::new("soapenv:Body")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("soapenv:Envelope")))
        .map_err(xml_err)?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_err)
}

fn xml_err<E: std::fmt::Display>(e: E) -> AxlError {
    AxlError::Xml(e.to_string())
}

/// Resultado de leer un sobre de respuesta
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeBody {
    /// Primer hijo de `Body` (ej: `addLocationResponse`)
    Response(XmlElement),
    Fault(AxlFault),
    Empty,
}

/// Lee el sobre SOAP devuelto por CUCM
pub fn parse_envelope(xml: &str) -> Result<EnvelopeBody, AxlError> {
    let root = XmlElement::parse(xml)?;
    if root.name != "Envelope" {
        return Err(AxlError::Xml(format!(
            "expected SOAP Envelope, found <{}>",
            root.name
        )));
    }

    let body = root
        .find("Body")
        .ok_or_else(|| AxlError::Xml("SOAP Envelope without Body".to_string()))?;

    match body.children.first() {
        Some(fault) if fault.name == "Fault" => Ok(EnvelopeBody::Fault(parse_fault(fault))),
        Some(response) => Ok(EnvelopeBody::Response(response.clone())),
        None => Ok(EnvelopeBody::Empty),
    }
}

fn parse_fault(fault: &XmlElement) -> AxlFault {
    let fault_string = fault
        .text_of("faultstring")
        .unwrap_or("unknown fault")
        .to_string();

    let axl_error = fault.path(&["detail", "axlError"]);
    let code = axl_error
        .and_then(|e| e.text_of("axlcode"))
        .and_then(|c| c.trim().parse().ok());
    let detail = axl_error
        .and_then(|e| e.text_of("axlmessage"))
        .map(str::to_string);

    AxlFault {
        fault_code: fault.text_of("faultcode").map(str::to_string),
        message: fault_string,
        axl_code: code,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_action() {
        assert_eq!(
            soap_action("12.5", "addLocation"),
            "\"CUCM:DB ver=12.5 addLocation\""
        );
    }

    #[test]
    fn test_build_envelope() {
        let request = AxlRequest::new(
            "getSipTrunk",
            vec![XmlElement::with_text("name", "Ottawa-GW")],
        );

        let xml = build_envelope("14.0", &request).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns:ns=\"http://www.cisco.com/AXL/API/14.0\""));
        assert!(xml.contains(
            "<soapenv:Header/><soapenv:Body><ns:getSipTrunk><name>Ottawa-GW</name></ns:getSipTrunk></soapenv:Body>"
        ));
    }

    #[test]
    fn test_parse_response() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
            <soapenv:Body>
              <ns:addLocationResponse xmlns:ns="http://www.cisco.com/AXL/API/12.5">
                <return>{4D3F2C1B-0000-1111-2222-333344445555}</return>
              </ns:addLocationResponse>
            </soapenv:Body>
          </soapenv:Envelope>"#;

        match parse_envelope(xml).unwrap() {
            EnvelopeBody::Response(resp) => {
                assert_eq!(resp.name, "addLocationResponse");
                assert_eq!(
                    resp.text_of("return"),
                    Some("{4D3F2C1B-0000-1111-2222-333344445555}")
                );
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_parse_fault_with_axl_detail() {
        let xml = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
            <soapenv:Body>
              <soapenv:Fault>
                <faultcode>soapenv:Client</faultcode>
                <faultstring>Could not insert new row - duplicate value in a UNIQUE INDEX column (Unique Index:).</faultstring>
                <detail>
                  <axlError>
                    <axlcode>-239</axlcode>
                    <axlmessage>Could not insert new row - duplicate value in a UNIQUE INDEX column (Unique Index:).</axlmessage>
                    <request>addLocation</request>
                  </axlError>
                </detail>
              </soapenv:Fault>
            </soapenv:Body>
          </soapenv:Envelope>"#;

        match parse_envelope(xml).unwrap() {
            EnvelopeBody::Fault(fault) => {
                assert_eq!(fault.fault_code.as_deref(), Some("soapenv:Client"));
                assert_eq!(fault.axl_code, Some(-239));
                assert!(fault.message.starts_with("Could not insert new row"));
                assert!(fault.detail.is_some());
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_envelope() {
        assert!(parse_envelope("<html><body>Login</body></html>").is_err());
    }
}
