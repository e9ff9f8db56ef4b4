// src/error.rs
use thiserror::Error;

use crate::axl::AxlError;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Site profile error: {0}")]
    Profile(String),

    #[error("Unknown provisioning step: {0}")]
    UnknownStep(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Axl(#[from] AxlError),
}

impl ProvisionError {
    pub fn error_code(&self) -> &str {
        match self {
            ProvisionError::Config(_) => "config_error",
            ProvisionError::Profile(_) => "profile_error",
            ProvisionError::UnknownStep(_) => "unknown_step",
            ProvisionError::InvalidRequest(_) => "invalid_request",
            ProvisionError::Axl(e) => e.error_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
