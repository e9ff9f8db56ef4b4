//! Integración con AXL (Administrative XML de CUCM)
//!
//! Este módulo proporciona:
//! - Client: transporte SOAP sobre HTTPS con autenticación básica
//! - Envelope: construcción y lectura de sobres SOAP 1.1
//! - Operations: llamadas tipadas (`addLocation`, `getSipTrunk`, ...)
//!
//! # Uso
//!
//! ```rust,ignore
//! use crate::axl::{AxlClient, AxlOperations};
//!
//! let client = AxlClient::new(
//!     "https://10.10.20.1:8443/axl/",
//!     "administrator",
//!     "ciscopsdt",
//!     "12.5",
//!     10,     // timeout_secs
//!     false,  // verify_tls
//! )?;
//!
//! let version = client.get_ccm_version().await?;
//! ```

mod client;
mod envelope;
mod operations;
mod types;
mod xml;

pub use client::{AxlClient, AxlError, AxlService};
#[cfg(test)]
pub use client::MockAxlService;
pub use envelope::{axl_namespace, build_envelope, parse_envelope, soap_action, EnvelopeBody};
pub use operations::{add_request, list_region_request, AxlOperations, Created};
pub use types::*;
pub use xml::XmlElement;
