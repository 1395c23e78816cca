//! # Pipeline Configuration
//!
//! Built once at startup and passed by value into the pipeline. Sources, in
//! increasing precedence:
//!
//! 1. YAML file named by `DOCROUTE_CONFIG` (optional).
//! 2. Environment variables:
//!    - `DOCROUTE_IDENTIFIER_SCHEME`: `simple` (default) or `peppol`
//!    - `DOCROUTE_VALIDATION_PROFILE`: `group:artifact:version`
//!    - `DOCROUTE_DIRECTORY_URL` (required)
//!    - `DOCROUTE_GATEWAY_URL` (required)
//!    - `DOCROUTE_GATEWAY_TOKEN`
//!    - `DOCROUTE_VALIDATION_URL` (required when a profile is set)
//!    - `DOCROUTE_HTTP_TIMEOUT_SECS`: applies to every client
//!
//! Empty variables count as unset.
//!
//! ```yaml
//! identifier_scheme: peppol
//! validation_profile: "eu.peppol.bis3:invoice:2024.5"
//! directory:
//!   base_url: "https://smp.example"
//! gateway:
//!   base_url: "https://gateway.internal"
//!   token: "..."
//!   timeout_secs: 60
//! validation_service:
//!   base_url: "https://phive.internal"
//! ```

use std::path::{Path, PathBuf};

use docroute_client::ClientConfig;
use docroute_core::{ExecutorSetId, IdentifierFactory};
use serde::Deserialize;
use url::Url;

pub const CONFIG_PATH_VAR: &str = "DOCROUTE_CONFIG";
pub const IDENTIFIER_SCHEME_VAR: &str = "DOCROUTE_IDENTIFIER_SCHEME";
pub const VALIDATION_PROFILE_VAR: &str = "DOCROUTE_VALIDATION_PROFILE";
pub const DIRECTORY_URL_VAR: &str = "DOCROUTE_DIRECTORY_URL";
pub const GATEWAY_URL_VAR: &str = "DOCROUTE_GATEWAY_URL";
pub const GATEWAY_TOKEN_VAR: &str = "DOCROUTE_GATEWAY_TOKEN";
pub const VALIDATION_URL_VAR: &str = "DOCROUTE_VALIDATION_URL";
pub const HTTP_TIMEOUT_VAR: &str = "DOCROUTE_HTTP_TIMEOUT_SECS";

/// Configuration errors. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("a validation profile is configured but DOCROUTE_VALIDATION_URL is not set")]
    ValidationServiceRequired,
}

/// On-disk shape. Every field optional; environment fills the gaps.
#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    identifier_scheme: Option<IdentifierFactory>,
    #[serde(default)]
    validation_profile: Option<ExecutorSetId>,
    #[serde(default)]
    directory: Option<ClientConfig>,
    #[serde(default)]
    gateway: Option<ClientConfig>,
    #[serde(default)]
    validation_service: Option<ClientConfig>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub identifier_scheme: IdentifierFactory,
    pub validation_profile: Option<ExecutorSetId>,
    pub directory: ClientConfig,
    pub gateway: ClientConfig,
    pub validation_service: Option<ClientConfig>,
}

impl PipelineConfig {
    /// Load from the process environment (and the file it names).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load with an explicit variable source.
    pub fn load(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let file = match env(CONFIG_PATH_VAR) {
            Some(path) => ConfigFile::read(Path::new(&path))?,
            None => ConfigFile::default(),
        };

        let identifier_scheme = match env(IDENTIFIER_SCHEME_VAR) {
            Some(raw) => raw
                .parse::<IdentifierFactory>()
                .map_err(|e| ConfigError::Invalid {
                    var: IDENTIFIER_SCHEME_VAR,
                    reason: e.to_string(),
                })?,
            None => file.identifier_scheme.unwrap_or_default(),
        };

        let validation_profile = match env(VALIDATION_PROFILE_VAR) {
            Some(raw) => Some(ExecutorSetId::parse(raw.trim()).map_err(|e| {
                ConfigError::Invalid {
                    var: VALIDATION_PROFILE_VAR,
                    reason: e.to_string(),
                }
            })?),
            None => file.validation_profile,
        };

        let timeout = env(HTTP_TIMEOUT_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::Invalid {
                        var: HTTP_TIMEOUT_VAR,
                        reason: e.to_string(),
                    })
            })
            .transpose()?;

        let directory = overlay_client(
            file.directory,
            env(DIRECTORY_URL_VAR),
            None,
            timeout,
            DIRECTORY_URL_VAR,
        )?
        .ok_or(ConfigError::Missing(DIRECTORY_URL_VAR))?;

        let gateway = overlay_client(
            file.gateway,
            env(GATEWAY_URL_VAR),
            env(GATEWAY_TOKEN_VAR),
            timeout,
            GATEWAY_URL_VAR,
        )?
        .ok_or(ConfigError::Missing(GATEWAY_URL_VAR))?;

        let validation_service = overlay_client(
            file.validation_service,
            env(VALIDATION_URL_VAR),
            None,
            timeout,
            VALIDATION_URL_VAR,
        )?;

        if validation_profile.is_some() && validation_service.is_none() {
            return Err(ConfigError::ValidationServiceRequired);
        }

        Ok(Self {
            identifier_scheme,
            validation_profile,
            directory,
            gateway,
            validation_service,
        })
    }

    /// Every configuration item as `(key, value)` in a stable order.
    ///
    /// Values are unmasked; callers exposing them must mask secrets.
    pub fn items(&self) -> Vec<(&'static str, String)> {
        let mut items = vec![
            ("identifier.scheme", self.identifier_scheme.to_string()),
            (
                "validation.profile",
                self.validation_profile
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
        ];
        match &self.validation_service {
            Some(v) => {
                items.push(("validation.url", v.base_url.to_string()));
                items.push(("validation.timeout_secs", v.timeout_secs.to_string()));
            }
            None => items.push(("validation.url", String::new())),
        }
        items.push(("directory.url", self.directory.base_url.to_string()));
        items.push((
            "directory.timeout_secs",
            self.directory.timeout_secs.to_string(),
        ));
        items.push(("gateway.url", self.gateway.base_url.to_string()));
        items.push((
            "gateway.token",
            self.gateway
                .token
                .as_ref()
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        ));
        items.push((
            "gateway.timeout_secs",
            self.gateway.timeout_secs.to_string(),
        ));
        items
    }
}

fn overlay_client(
    base: Option<ClientConfig>,
    url: Option<String>,
    token: Option<String>,
    timeout_secs: Option<u64>,
    var: &'static str,
) -> Result<Option<ClientConfig>, ConfigError> {
    let url = url
        .map(|raw| {
            Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            })
        })
        .transpose()?;

    let mut cfg = match (base, url) {
        (Some(mut cfg), Some(url)) => {
            cfg.base_url = url;
            cfg
        }
        (Some(cfg), None) => cfg,
        (None, Some(url)) => ClientConfig::new(url),
        (None, None) => return Ok(None),
    };
    if let Some(token) = token {
        cfg = cfg.with_token(token);
    }
    if let Some(secs) = timeout_secs {
        cfg.timeout_secs = secs;
    }
    Ok(Some(cfg))
}
