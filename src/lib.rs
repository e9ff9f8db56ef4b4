// src/lib.rs
pub mod axl;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{Config, ConfigOverrides};
pub use error::{ProvisionError, Result};
