//! Cliente HTTP SOAP para AXL
//!
//! Proporciona comunicación de bajo nivel con el servicio AXL de CUCM.

use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder, StatusCode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, instrument};

use super::envelope::{build_envelope, parse_envelope, soap_action, EnvelopeBody};
use super::types::{AxlFault, AxlRequest, AxlResponse};
use crate::config::Config;

/// Errores del cliente AXL
#[derive(Debug, Error)]
pub enum AxlError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout: request took longer than {0}s")]
    Timeout(u64),

    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    #[error("Unauthorized: check AXL credentials and role")]
    Unauthorized,

    #[error("XML error: {0}")]
    Xml(String),

    #[error("SOAP fault: {0}")]
    Fault(AxlFault),

    #[error("Empty response from CUCM")]
    EmptyResponse,

    #[error("Invalid identifier in response: {0}")]
    InvalidIdentifier(String),
}

impl AxlError {
    pub fn error_code(&self) -> &str {
        match self {
            AxlError::Connection(_) => "connection_error",
            AxlError::Timeout(_) => "timeout",
            AxlError::HttpStatus(_) => "http_error",
            AxlError::Unauthorized => "unauthorized",
            AxlError::Xml(_) => "xml_error",
            AxlError::Fault(_) => "soap_fault",
            AxlError::EmptyResponse => "empty_response",
            AxlError::InvalidIdentifier(_) => "invalid_identifier",
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, AxlError::Fault(_))
    }
}

/// Servicio capaz de ejecutar peticiones AXL
///
/// Los flujos de aprovisionamiento dependen de este trait y no del
/// cliente HTTP concreto.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AxlService: Send + Sync {
    /// Ejecuta la operación y devuelve `{operation}Response` junto al sobre crudo
    async fn execute(&self, request: AxlRequest) -> Result<AxlResponse, AxlError>;
}

/// Cliente para comunicación con CUCM
pub struct AxlClient {
    http_client: Client,
    endpoint: String,
    username: String,
    password: String,
    version: String,
    timeout_secs: u64,
    debug_envelopes: bool,
    request_count: AtomicU64,
}

impl AxlClient {
    /// Crea un nuevo cliente AXL
    ///
    /// # Arguments
    ///
    /// * `endpoint` - URL del servicio (ej: "https://10.10.20.1:8443/axl/")
    /// * `username` / `password` - Credenciales del usuario de aplicación AXL
    /// * `version` - Versión del esquema AXL (ej: "12.5")
    /// * `timeout_secs` - Timeout por petición
    /// * `verify_tls` - CUCM usa certificados autofirmados por defecto
    pub fn new(
        endpoint: &str,
        username: &str,
        password: &str,
        version: &str,
        timeout_secs: u64,
        verify_tls: bool,
    ) -> Result<Self, AxlError> {
        let http_client = ClientBuilder::new()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(!verify_tls)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| AxlError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            version: version.to_string(),
            timeout_secs,
            debug_envelopes: false,
            request_count: AtomicU64::new(0),
        })
    }

    /// Crea un cliente desde la configuración cargada
    pub fn from_config(config: &Config) -> Result<Self, AxlError> {
        let client = Self::new(
            &config.endpoint(),
            &config.username,
            &config.password,
            &config.axl_version,
            config.timeout_secs,
            config.verify_tls,
        )?;
        Ok(client.with_debug_envelopes(config.debug_envelopes))
    }

    /// Registra los sobres completos de petición y respuesta en nivel debug
    pub fn with_debug_envelopes(mut self, enabled: bool) -> Self {
        self.debug_envelopes = enabled;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Número de peticiones enviadas por este cliente
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Ejecuta una llamada SOAP contra AXL
    #[instrument(skip(self, request), fields(operation = %request.operation))]
    pub async fn call(&self, request: AxlRequest) -> Result<AxlResponse, AxlError> {
        let envelope = build_envelope(&self.version, &request)?;
        let sequence = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        debug!("AXL request: operation={}, seq={}", request.operation, sequence);

        let http_request = self
            .http_client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", soap_action(&self.version, &request.operation))
            .body(envelope.clone())
            .build()
            .map_err(|e| AxlError::Connection(e.to_string()))?;

        if self.debug_envelopes {
            debug!(
                "\nRequest\n-------\n{} {}\nHeaders:\n{}\nBody:\n{}",
                http_request.method(),
                http_request.url(),
                format_headers(http_request.headers()),
                envelope
            );
        }

        let response = self
            .http_client
            .execute(http_request)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AxlError::Timeout(self.timeout_secs)
                } else {
                    AxlError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        let response_headers = self.debug_envelopes.then(|| format_headers(response.headers()));
        let body = response
            .text()
            .await
            .map_err(|e| AxlError::Connection(format!("Failed to read response body: {}", e)))?;

        if let Some(headers) = response_headers {
            debug!(
                "\nResponse\n--------\nStatus: {}\nHeaders:\n{}\nBody:\n{}",
                status, headers, body
            );
        }

        interpret_response(status, &body)
    }
}

/// Interpreta estado HTTP + cuerpo
///
/// CUCM responde los fallos con HTTP 500 y un sobre SOAP, por lo que el
/// sobre se revisa antes que el estado.
pub(crate) fn interpret_response(status: StatusCode, body: &str) -> Result<AxlResponse, AxlError> {
    match parse_envelope(body) {
        Ok(EnvelopeBody::Fault(fault)) => {
            error!("AXL fault: status={}, fault={}", status, fault);
            return Err(AxlError::Fault(fault));
        }
        Ok(EnvelopeBody::Response(element)) if status.is_success() => {
            return Ok(AxlResponse::new(element, body));
        }
        Ok(EnvelopeBody::Empty) if status.is_success() => return Err(AxlError::EmptyResponse),
        Ok(_) => {}
        Err(e) if status.is_success() => return Err(e),
        Err(_) => {}
    }

    if status == StatusCode::UNAUTHORIZED {
        error!("AXL rejected credentials");
        return Err(AxlError::Unauthorized);
    }

    error!("AXL HTTP error: status={}", status);
    Err(AxlError::HttpStatus(status.as_u16()))
}

/// Una cabecera por línea; la autorización se enmascara
fn format_headers(headers: &header::HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if *name == header::AUTHORIZATION {
                "<redacted>"
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}: {}", name, value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl AxlService for AxlClient {
    async fn execute(&self, request: AxlRequest) -> Result<AxlResponse, AxlError> {
        self.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
        <soapenv:Body><ns:getCCMVersionResponse xmlns:ns="http://www.cisco.com/AXL/API/12.5">
        <return><componentVersion><version>12.5.1.11900(146)</version></componentVersion></return>
        </ns:getCCMVersionResponse></soapenv:Body></soapenv:Envelope>"#;

    const FAULT_BODY: &str = r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
        <soapenv:Body><soapenv:Fault><faultcode>soapenv:Client</faultcode>
        <faultstring>Item not valid: The specified Region was not found</faultstring>
        <detail><axlError><axlcode>5007</axlcode><axlmessage>Item not valid</axlmessage>
        <request>addDevicePool</request></axlError></detail>
        </soapenv:Fault></soapenv:Body></soapenv:Envelope>"#;

    #[test]
    fn test_client_creation() {
        let client = AxlClient::new(
            "https://10.10.20.1:8443/axl/",
            "administrator",
            "ciscopsdt",
            "12.5",
            10,
            false,
        );
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.endpoint(), "https://10.10.20.1:8443/axl/");
        assert_eq!(client.version(), "12.5");
        assert_eq!(client.request_count(), 0);
    }

    #[test]
    fn test_format_headers_masks_credentials() {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/xml; charset=utf-8".parse().unwrap());
        headers.insert(
            header::HeaderName::from_static("soapaction"),
            "\"CUCM:DB ver=12.5 addLocation\"".parse().unwrap(),
        );
        headers.insert(header::AUTHORIZATION, "Basic YWRtaW46c2VjcmV0".parse().unwrap());

        let dump = format_headers(&headers);

        assert!(dump.contains("content-type: text/xml; charset=utf-8"));
        assert!(dump.contains("soapaction: \"CUCM:DB ver=12.5 addLocation\""));
        assert!(dump.contains("authorization: <redacted>"));
        assert!(!dump.contains("YWRtaW46c2VjcmV0"));
        assert_eq!(dump.lines().count(), 3);
    }

    #[test]
    fn test_interpret_success() {
        let response = interpret_response(StatusCode::OK, OK_BODY).unwrap();
        assert_eq!(response.body.name, "getCCMVersionResponse");
        // The envelope is kept exactly as received, prefixes included
        assert_eq!(response.raw, OK_BODY);
        assert!(response.raw.contains("<ns:getCCMVersionResponse"));
    }

    #[test]
    fn test_interpret_fault_on_500() {
        let err = interpret_response(StatusCode::INTERNAL_SERVER_ERROR, FAULT_BODY).unwrap_err();
        match err {
            AxlError::Fault(fault) => {
                assert_eq!(fault.axl_code, Some(5007));
                assert!(fault.message.contains("Region was not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_interpret_unauthorized_html() {
        let err = interpret_response(
            StatusCode::UNAUTHORIZED,
            "<html><head><title>401 Unauthorized</title></head></html>",
        )
        .unwrap_err();
        assert!(matches!(err, AxlError::Unauthorized));
    }

    #[test]
    fn test_interpret_http_error_without_envelope() {
        let err = interpret_response(StatusCode::SERVICE_UNAVAILABLE, "busy").unwrap_err();
        assert!(matches!(err, AxlError::HttpStatus(503)));
    }

    #[test]
    fn test_interpret_garbage_on_success() {
        let err = interpret_response(StatusCode::OK, "not xml at all").unwrap_err();
        assert!(matches!(err, AxlError::Xml(_)));
    }
}
