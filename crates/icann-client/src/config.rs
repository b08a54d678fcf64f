//! Client configuration
//!
//! A [`Config`] names the target zone, the API routing (version, entity,
//! environment) and the credentials for one of the two authentication
//! schemes. [`Config::validate`] is pure and must pass before any network
//! activity; [`crate::Client::new`] applies [`Config::with_defaults`] first.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Production MOSAPI endpoint
pub const MOSAPI_URL: &str = "https://mosapi.icann.org";

/// Operational test environment endpoint
pub const MOSAPI_OTE_URL: &str = "https://mosapi-ote.icann.org";

/// Target environment, which alone decides the base URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Prod,
    Ote,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Prod => "prod",
            Environment::Ote => "ote",
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Prod => MOSAPI_URL,
            Environment::Ote => MOSAPI_OTE_URL,
        }
    }
}

/// Authentication scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// HTTP Basic credentials on every request
    Basic,
    /// Client certificate presented during the TLS handshake
    Tlsa,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Basic => "basic",
            AuthType::Tlsa => "tlsa",
        }
    }
}

/// API version segment of resource paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "v2")]
    V2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
        }
    }
}

/// Role of the API consumer, embedded in resource paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Entity {
    /// Registry (`ry`)
    #[default]
    #[serde(rename = "ry")]
    Registry,
    /// Registrar (`rr`)
    #[serde(rename = "rr")]
    Registrar,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Registry => "ry",
            Entity::Registrar => "rr",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prod" => Ok(Environment::Prod),
            "ote" => Ok(Environment::Ote),
            _ => Err(ConfigError::InvalidEnvironment),
        }
    }
}

impl FromStr for AuthType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(AuthType::Basic),
            "tlsa" => Ok(AuthType::Tlsa),
            _ => Err(ConfigError::InvalidAuthType),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v2" => Ok(ApiVersion::V2),
            _ => Err(ConfigError::UnsupportedVersion),
        }
    }
}

impl FromStr for Entity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ry" => Ok(Entity::Registry),
            "rr" => Ok(Entity::Registrar),
            _ => Err(ConfigError::UnsupportedEntity),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Environment, AuthType, ApiVersion, Entity);

/// Full set of parameters needed to construct a client
///
/// `None` selectors are "unset": [`Config::with_defaults`] fills version,
/// entity and environment, while an unset auth type stays invalid.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target zone (or registrar ID for `rr`)
    pub tld: String,
    pub auth_type: Option<AuthType>,
    pub username: String,
    pub password: String,
    /// PEM-encoded client certificate, required for [`AuthType::Tlsa`]
    pub certificate_pem: String,
    /// PEM-encoded private key, required for [`AuthType::Tlsa`]
    pub key_pem: String,
    pub version: Option<ApiVersion>,
    pub entity: Option<Entity>,
    pub environment: Option<Environment>,
}

impl Config {
    /// Basic-auth configuration for `tld` with all other settings defaulted
    pub fn basic(tld: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            tld: tld.into(),
            auth_type: Some(AuthType::Basic),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
        .with_defaults()
    }

    /// Mutual-TLS configuration for `tld` with all other settings defaulted
    pub fn tlsa(tld: impl Into<String>, certificate_pem: impl Into<String>, key_pem: impl Into<String>) -> Self {
        Self {
            tld: tld.into(),
            auth_type: Some(AuthType::Tlsa),
            certificate_pem: certificate_pem.into(),
            key_pem: key_pem.into(),
            ..Self::default()
        }
        .with_defaults()
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Fill unset version, environment and entity; set values are kept
    pub fn with_defaults(mut self) -> Self {
        self.version.get_or_insert(ApiVersion::V2);
        self.environment.get_or_insert(Environment::Prod);
        self.entity.get_or_insert(Entity::Registry);
        self
    }

    /// Check every rule and return the first one violated
    ///
    /// Order: environment, version, TLD, auth type, entity, then the fields
    /// the auth type requires.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.environment.ok_or(ConfigError::InvalidEnvironment)?;
        self.version.ok_or(ConfigError::UnsupportedVersion)?;
        if self.tld.is_empty() {
            return Err(ConfigError::TldRequired);
        }
        let auth_type = self.auth_type.ok_or(ConfigError::InvalidAuthType)?;
        self.entity.ok_or(ConfigError::UnsupportedEntity)?;

        match auth_type {
            AuthType::Tlsa => {
                if self.certificate_pem.is_empty() {
                    return Err(ConfigError::CertificateRequired);
                }
                if self.key_pem.is_empty() {
                    return Err(ConfigError::KeyRequired);
                }
            }
            AuthType::Basic => {
                if self.username.is_empty() {
                    return Err(ConfigError::UsernameRequired);
                }
                if self.password.is_empty() {
                    return Err(ConfigError::PasswordRequired);
                }
            }
        }

        Ok(())
    }

    /// Environment after defaulting
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Entity after defaulting
    pub fn entity(&self) -> Entity {
        self.entity.unwrap_or_default()
    }

    /// Version after defaulting
    pub fn version(&self) -> ApiVersion {
        self.version.unwrap_or_default()
    }

    /// `/{entity}/{tld}/{version}` prefix shared by MOSAPI resources
    pub fn resource_prefix(&self) -> String {
        format!("/{}/{}/{}", self.entity(), self.tld, self.version())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redacted(value: &str) -> &'static str {
            if value.is_empty() {
                ""
            } else {
                "***"
            }
        }

        f.debug_struct("Config")
            .field("tld", &self.tld)
            .field("auth_type", &self.auth_type)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .field("certificate_pem", &redacted(&self.certificate_pem))
            .field("key_pem", &redacted(&self.key_pem))
            .field("version", &self.version)
            .field("entity", &self.entity)
            .field("environment", &self.environment)
            .finish()
    }
}
