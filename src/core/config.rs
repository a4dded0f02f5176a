use std::env;
use std::time::Duration;

use crate::core::api_key::{self, CredentialSource};
use crate::core::gemini::DEFAULT_BASE_URL;
use crate::core::probe::ProbeSettings;

/// Environment variable overriding the API root.
pub const BASE_URL_VAR: &str = "GEMINI_BASE_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub credential_source: CredentialSource,
    pub base_url: String,
    /// Per-request timeout; `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
    pub probe: ProbeSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "No API key found. Set GOOGLE_API_KEY (environment or .env) or run `{} config set-api-key`",
        crate::core::app::NAME
    )]
    CredentialMissing,
}

/// Base URL from the environment, or the public endpoint.
pub fn base_url() -> String {
    env::var(BASE_URL_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Load configuration from environment. Prompts for the key on a terminal when
/// `allow_prompt` is set; returns an error if no key can be obtained.
pub fn load(allow_prompt: bool) -> Result<Config, ConfigError> {
    let (api_key, credential_source) =
        api_key::resolve(allow_prompt).ok_or(ConfigError::CredentialMissing)?;

    Ok(Config {
        api_key,
        credential_source,
        base_url: base_url(),
        request_timeout: None,
        probe: ProbeSettings::default(),
    })
}
