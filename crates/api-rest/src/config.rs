//! REST server configuration.
//!
//! Resolved once at process startup and passed into the router. The parsing functions take
//! `Option<String>` values rather than reading the environment themselves, so they can be tested
//! without mutating process-wide state.

use std::net::{AddrParseError, SocketAddr};

/// Address used when `TRAJECTORY_REST_ADDR` is unset or blank.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";

pub const REST_ADDR_ENV: &str = "TRAJECTORY_REST_ADDR";
pub const ENABLE_SWAGGER_ENV: &str = "TRAJECTORY_ENABLE_SWAGGER";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} value {value:?}: {source}")]
    InvalidAddr {
        name: &'static str,
        value: String,
        #[source]
        source: AddrParseError,
    },
    #[error("invalid {name} value {value:?}: expected true/false, 1/0 or yes/no")]
    InvalidFlag { name: &'static str, value: String },
}

/// Runtime configuration for the REST server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestConfig {
    addr: SocketAddr,
    enable_swagger: bool,
}

impl RestConfig {
    pub fn new(addr: SocketAddr, enable_swagger: bool) -> Self {
        Self {
            addr,
            enable_swagger,
        }
    }

    /// Reads `TRAJECTORY_REST_ADDR` and `TRAJECTORY_ENABLE_SWAGGER` from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if either variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_values(
            std::env::var(REST_ADDR_ENV).ok(),
            std::env::var(ENABLE_SWAGGER_ENV).ok(),
        )
    }

    /// Builds a configuration from raw optional values.
    ///
    /// Missing or blank values fall back to the defaults (`0.0.0.0:8000`, Swagger enabled).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a present value cannot be parsed.
    pub fn from_env_values(
        addr: Option<String>,
        enable_swagger: Option<String>,
    ) -> Result<Self, ConfigError> {
        let addr = non_blank(addr).unwrap_or_else(|| DEFAULT_REST_ADDR.to_string());
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddr {
                name: REST_ADDR_ENV,
                value: addr.clone(),
                source,
            })?;

        let enable_swagger = match non_blank(enable_swagger) {
            None => true,
            Some(value) => parse_flag(ENABLE_SWAGGER_ENV, &value)?,
        };

        Ok(Self::new(addr, enable_swagger))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn enable_swagger(&self) -> bool {
        self.enable_swagger
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], 8000)), true)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
