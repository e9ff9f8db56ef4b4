// src/config.rs
use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use crate::error::ProvisionError;

const DEFAULT_AXL_PORT: u16 = 8443;
pub const DEFAULT_AXL_VERSION: &str = "12.5";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub cucm_address: String,
    pub axl_port: u16,
    pub username: String,
    pub password: String,
    pub axl_version: String,
    pub timeout_secs: u64,
    pub verify_tls: bool,
    pub debug_envelopes: bool,
}

/// Values given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cucm_address: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub debug_envelopes: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ProvisionError> {
        Self::from_env_with(&ConfigOverrides::default())
    }

    /// Missing AXL credentials are asked for on the terminal when stdin is one.
    pub fn from_env_with(overrides: &ConfigOverrides) -> Result<Self, ProvisionError> {
        dotenv::dotenv().ok();
        Self::from_lookup_with_prompt(|key| env::var(key).ok(), overrides, prompt_credential)
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with_prompt(lookup, overrides, |_| None)
    }

    /// Like [`Config::from_lookup`]; `prompt` supplies `AXL_USERNAME` and
    /// `AXL_PASSWORD` when neither the overrides nor the lookup have them.
    pub fn from_lookup_with_prompt<F, P>(
        lookup: F,
        overrides: &ConfigOverrides,
        prompt: P,
    ) -> Result<Self, ProvisionError>
    where
        F: Fn(&str) -> Option<String>,
        P: Fn(&str) -> Option<String>,
    {
        let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let required = |value: Option<String>, key: &str| {
            present(value).ok_or_else(|| ProvisionError::Config(format!("{} not set", key)))
        };
        let credential = |value: Option<String>, key: &str| {
            required(present(value).or_else(|| prompt(key)), key)
        };

        let cucm_address = required(
            overrides.cucm_address.clone().or_else(|| lookup("CUCM_ADDRESS")),
            "CUCM_ADDRESS",
        )?;
        let username = credential(
            overrides.username.clone().or_else(|| lookup("AXL_USERNAME")),
            "AXL_USERNAME",
        )?;
        let password = credential(
            overrides.password.clone().or_else(|| lookup("AXL_PASSWORD")),
            "AXL_PASSWORD",
        )?;

        let axl_port = match lookup("AXL_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ProvisionError::Config(format!("Invalid AXL_PORT: {}", v)))?,
            None => DEFAULT_AXL_PORT,
        };

        let timeout_secs = match lookup("AXL_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ProvisionError::Config(format!("Invalid AXL_TIMEOUT_SECS: {}", v)))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let verify_tls = parse_bool(lookup("AXL_VERIFY_TLS"), "AXL_VERIFY_TLS", false)?;
        let debug_envelopes =
            overrides.debug_envelopes || parse_bool(lookup("AXL_DEBUG"), "AXL_DEBUG", false)?;

        Ok(Config {
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),
            cucm_address,
            axl_port,
            username,
            password,
            axl_version: axl_version_from(&lookup),
            timeout_secs,
            verify_tls,
            debug_envelopes,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("https://{}:{}/axl/", self.cucm_address, self.axl_port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `AXL_VERSION` from the environment or `.env`, without needing the rest of
/// the configuration.
pub fn axl_version_from_env() -> String {
    dotenv::dotenv().ok();
    axl_version_from(|key| env::var(key).ok())
}

pub fn axl_version_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("AXL_VERSION")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_AXL_VERSION.to_string())
}

/// Reads a missing credential from the terminal; `None` when not interactive.
fn prompt_credential(key: &str) -> Option<String> {
    if !io::stdin().is_terminal() {
        return None;
    }

    let value = match key {
        "AXL_PASSWORD" => rpassword::prompt_password("Password: ").ok()?,
        _ => {
            eprint!("Username: ");
            io::stderr().flush().ok()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).ok()?;
            line
        }
    };

    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn parse_bool(value: Option<String>, key: &str, default: bool) -> Result<bool, ProvisionError> {
    match value.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ProvisionError::Config(format!("Invalid {}: {}", key, v))),
        },
    }
}
