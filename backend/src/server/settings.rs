//! Application settings loaded once at start-up via OrthoConfig.
//!
//! Raw settings are converted into [`BackendConfig`] before anything else
//! sees them; handlers and adapters only receive typed values.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{Capability, CapabilityFlags, ClientFlags};
use crate::outbound::generation::OpenAiSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_AI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(60);

/// Raw settings read from CLI arguments, `IREAL_*` variables and files.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IREAL")]
pub struct AppSettings {
    /// Forward calendar calls to the content service.
    #[ortho_config(default = false)]
    pub calendar_service: bool,
    /// Forward plan chat calls to the content service.
    #[ortho_config(default = false)]
    pub plans_service: bool,
    /// Forward idea CRUD to the content service.
    #[ortho_config(default = false)]
    pub ideas_service: bool,
    /// Forward publish calls to the content service.
    #[ortho_config(default = false)]
    pub publish_service: bool,
    /// Base URL of the content service.
    pub service_base_url: Option<String>,
    /// Outbound request timeout for forwarded calls.
    pub service_timeout_secs: Option<u64>,
    /// Client-visible navigation state experiment.
    #[ortho_config(default = false)]
    pub nav_state_experiment: bool,
    /// PostgreSQL URL for the local ideas store.
    pub database_url: Option<String>,
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Base URL of an OpenAI-compatible provider.
    pub ai_base_url: Option<String>,
    /// Provider API key.
    pub ai_api_key: Option<String>,
    /// Provider model name.
    pub ai_model: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("calendar_service", &self.calendar_service)
            .field("plans_service", &self.plans_service)
            .field("ideas_service", &self.ideas_service)
            .field("publish_service", &self.publish_service)
            .field("service_base_url", &self.service_base_url)
            .field("service_timeout_secs", &self.service_timeout_secs)
            .field("nav_state_experiment", &self.nav_state_experiment)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("bind_addr", &self.bind_addr)
            .field("ai_base_url", &self.ai_base_url)
            .field("ai_api_key", &self.ai_api_key.as_ref().map(|_| "<redacted>"))
            .field("ai_model", &self.ai_model)
            .finish()
    }
}

/// Errors raised while validating settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A capability is forwarded but no service base URL is set.
    #[error("{capability} is forwarded but IREAL_SERVICE_BASE_URL is not set")]
    MissingServiceBaseUrl {
        /// First forwarded capability found.
        capability: &'static str,
    },
    /// A URL setting does not parse.
    #[error("invalid URL in {name}: {message}")]
    InvalidUrl {
        /// Setting name.
        name: &'static str,
        /// Parser message.
        message: String,
    },
    /// The bind address does not parse.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr {
        /// Raw value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The service timeout is zero.
    #[error("IREAL_SERVICE_TIMEOUT_SECS must be greater than zero")]
    ZeroTimeout,
}

/// Connection settings for the content service gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Absolute base URL.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Typed configuration derived from [`AppSettings`].
#[derive(Debug)]
pub struct BackendConfig {
    /// Flags exposed to clients; also selects the capability strategies.
    pub client_flags: ClientFlags,
    /// Gateway settings; present whenever any capability is forwarded.
    pub gateway: Option<GatewayConfig>,
    /// Text generation provider, if configured.
    pub generator: Option<OpenAiSettings>,
    /// Database URL for the local ideas store.
    pub database_url: Option<String>,
    /// Listen address.
    pub bind_addr: SocketAddr,
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw.trim()).map_err(|err| SettingsError::InvalidUrl {
        name,
        message: err.to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

impl AppSettings {
    /// Capability strategy flags.
    #[must_use]
    pub fn capability_flags(&self) -> CapabilityFlags {
        CapabilityFlags {
            calendar: self.calendar_service,
            plans: self.plans_service,
            ideas: self.ideas_service,
            publish: self.publish_service,
        }
    }

    fn gateway(&self, flags: &CapabilityFlags) -> Result<Option<GatewayConfig>, SettingsError> {
        let Some(raw) = non_blank(self.service_base_url.clone()) else {
            return match Capability::ALL
                .into_iter()
                .find(|capability| flags.is_forwarded(*capability))
            {
                Some(capability) => Err(SettingsError::MissingServiceBaseUrl {
                    capability: capability.as_str(),
                }),
                None => Ok(None),
            };
        };
        if !flags.any() {
            return Ok(None);
        }
        let secs = self
            .service_timeout_secs
            .unwrap_or(DEFAULT_SERVICE_TIMEOUT_SECS);
        if secs == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(Some(GatewayConfig {
            base_url: parse_url("IREAL_SERVICE_BASE_URL", &raw)?,
            timeout: Duration::from_secs(secs),
        }))
    }

    fn generator(&self) -> Result<Option<OpenAiSettings>, SettingsError> {
        let base = non_blank(self.ai_base_url.clone());
        let api_key = non_blank(self.ai_api_key.clone());
        if base.is_none() && api_key.is_none() {
            return Ok(None);
        }
        let base_url = parse_url(
            "IREAL_AI_BASE_URL",
            base.as_deref().unwrap_or(DEFAULT_AI_BASE_URL),
        )?;
        Ok(Some(OpenAiSettings {
            base_url,
            api_key: api_key.map(Zeroizing::new),
            model: non_blank(self.ai_model.clone()).unwrap_or_else(|| DEFAULT_AI_MODEL.to_owned()),
            timeout: DEFAULT_AI_TIMEOUT,
        }))
    }

    /// Validate and convert into [`BackendConfig`].
    ///
    /// # Errors
    /// Returns [`SettingsError`] when a forwarded capability has no base URL,
    /// a URL or the bind address is malformed, or the timeout is zero.
    pub fn into_config(self) -> Result<BackendConfig, SettingsError> {
        let capabilities = self.capability_flags();
        let gateway = self.gateway(&capabilities)?;
        let generator = self.generator()?;
        let raw_bind = non_blank(self.bind_addr.clone()).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = raw_bind
            .parse::<SocketAddr>()
            .map_err(|err| SettingsError::InvalidBindAddr {
                value: raw_bind.clone(),
                message: err.to_string(),
            })?;
        Ok(BackendConfig {
            client_flags: ClientFlags {
                nav_state_experiment: self.nav_state_experiment,
                capabilities,
            },
            gateway,
            generator,
            database_url: non_blank(self.database_url),
            bind_addr,
        })
    }
}
