// src/config.rs

use std::env;

use secrecy::SecretString;
use url::Url;

use crate::error::ConfigError;

/// Default Proof of Invention endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://poi.molecule.xyz/api/v1/inventions";

/// Default port for the HTTP transport.
pub const DEFAULT_PORT: u16 = 8080;

// A struct to hold all configuration, loaded once at startup from the environment.
#[derive(Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    /// Bearer token presented to the Proof of Invention API.
    pub api_token: SecretString,
    /// Upload endpoint. Fixed in production, overridable for staging and tests.
    pub api_endpoint: Url,
}

impl Config {
    /// Builds a configuration directly, bypassing the environment.
    pub fn new(api_token: impl Into<String>, api_endpoint: &str) -> Result<Self, ConfigError> {
        let token = api_token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Config {
            port: DEFAULT_PORT,
            api_token: SecretString::new(token),
            api_endpoint: parse_endpoint(api_endpoint)?,
        })
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let api_endpoint = match lookup("POI_API_ENDPOINT") {
            Some(raw) if !raw.trim().is_empty() => parse_endpoint(raw.trim())?,
            _ => parse_endpoint(DEFAULT_API_ENDPOINT)?,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            port,
            api_token: SecretString::new(api_token),
            api_endpoint,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidEndpoint {
        value: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidEndpoint {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
