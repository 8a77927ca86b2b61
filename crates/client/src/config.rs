//! Client configuration

use std::time::Duration;

use crate::error::ClientError;

/// Well-known FHIR servers the tutorial can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerProfile {
    PublicVonk,
    PublicHapi,
    Local,
}

impl ServerProfile {
    /// Base URL of the server
    pub fn base_url(self) -> &'static str {
        match self {
            ServerProfile::PublicVonk => "http://vonk.fire.ly",
            ServerProfile::PublicHapi => "http://hapi.fhir.org/baseR4/",
            ServerProfile::Local => "http://vonk.fire.ly",
        }
    }

    /// Look up a profile by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "publicvonk" => Some(ServerProfile::PublicVonk),
            "publichapi" => Some(ServerProfile::PublicHapi),
            "local" => Some(ServerProfile::Local),
            _ => None,
        }
    }
}

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    pub timeout: Duration,
}

impl Config {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Configuration pointing at one of the well-known servers
    pub fn for_profile(profile: ServerProfile) -> Self {
        Self::for_url(profile.base_url())
    }

    /// Configuration pointing at an arbitrary base URL
    pub fn for_url(url: &str) -> Self {
        Self {
            server_url: url.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables
    ///
    /// `FHIR_SERVER` is either a profile name (`PublicVonk`, `PublicHapi`,
    /// `Local`) or a base URL. `FHIR_TIMEOUT_SECS` sets the request timeout.
    pub fn from_env() -> Result<Self, ClientError> {
        let server = std::env::var("FHIR_SERVER").ok();
        let timeout = std::env::var("FHIR_TIMEOUT_SECS").ok();
        Self::from_values(server.as_deref(), timeout.as_deref())
    }

    fn from_values(server: Option<&str>, timeout: Option<&str>) -> Result<Self, ClientError> {
        let mut config = match server {
            None => Self::for_profile(ServerProfile::PublicVonk),
            Some(value) => match ServerProfile::from_name(value) {
                Some(profile) => Self::for_profile(profile),
                None if value.starts_with("http://") || value.starts_with("https://") => {
                    Self::for_url(value)
                }
                None => {
                    return Err(ClientError::Config(format!(
                        "FHIR_SERVER must be a profile name or an http(s) URL, got '{}'",
                        value
                    )));
                }
            },
        };

        if let Some(secs) = timeout {
            let secs: u64 = secs.parse().map_err(|_| {
                ClientError::Config(format!("FHIR_TIMEOUT_SECS is not a number: '{}'", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
