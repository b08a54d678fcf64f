//! Error types for the ICANN client library
//!
//! Errors are values, not messages: callers branch on the variant (and on
//! [`ConfigError`] identity) rather than matching on display text.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration failed validation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The client certificate or private key could not be parsed
    #[error(transparent)]
    Tls(#[from] TlsError),

    /// A base URL or request path could not be parsed
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Connection failure, timeout or other transport-level error, unchanged
    /// from the underlying HTTP stack
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The caller's cancellation token fired before the response arrived
    #[error("request cancelled")]
    Cancelled,

    /// The server answered outside the 2xx range
    #[error(transparent)]
    Status(#[from] HttpStatusError),

    /// A 2xx response carried a body that is not valid JSON for the target type
    #[error("failed to decode response from {}: {source}", response.url)]
    Decode {
        #[source]
        source: serde_json::Error,
        response: ResponseMeta,
    },

    /// The request body could not be encoded as JSON
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A status code with no meaning for the endpoint that received it
    #[error("unexpected status code: {} for {method} {url}", status.as_u16())]
    UnexpectedStatus {
        status: StatusCode,
        method: Method,
        url: String,
    },

    /// A header value could not be built from the configured credentials
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The request body is a stream and cannot be cloned before sending
    #[error("request body cannot be cloned; buffer the body before sending")]
    UnclonableRequest,
}

impl Error {
    /// The typed HTTP error, if this is one
    pub fn as_status(&self) -> Option<&HttpStatusError> {
        match self {
            Error::Status(err) => Some(err),
            _ => None,
        }
    }

    /// The configuration rule that failed, if this is a configuration error
    pub fn as_config(&self) -> Option<ConfigError> {
        match self {
            Error::Config(err) => Some(*err),
            _ => None,
        }
    }

    /// Whether the request ran out of time, either through the client timeout
    /// or the caller's deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Network(err) if err.is_timeout())
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration validation failures, one per rule
///
/// Variants are reported in the order [`crate::Config::validate`] checks
/// them, and compare by identity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigError {
    #[error("invalid environment only [prod ote] are supported")]
    InvalidEnvironment,

    #[error("unsupported version only [v2] are supported")]
    UnsupportedVersion,

    #[error("TLD is required")]
    TldRequired,

    #[error("invalid authType only [tlsa basic] are supported")]
    InvalidAuthType,

    #[error("unsupported entity only [ry rr] are supported")]
    UnsupportedEntity,

    #[error("certificate PEM is required when AuthType is TLSA")]
    CertificateRequired,

    #[error("key PEM is required when AuthType is TLSA")]
    KeyRequired,

    #[error("username is required when AuthType is basic")]
    UsernameRequired,

    #[error("password is required when AuthType is basic")]
    PasswordRequired,
}

/// Client certificate / private key parsing failures
#[derive(Error, Debug)]
pub enum TlsError {
    #[error("no certificate found in certificate PEM")]
    NoCertificate,

    #[error("no private key found in key PEM")]
    NoPrivateKey,

    #[error("malformed PEM: {0}")]
    Pem(#[from] std::io::Error),

    #[error("certificate and key do not form a usable identity: {0}")]
    Identity(#[source] reqwest::Error),
}

/// A non-2xx response, identified by status code and the request that
/// produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusError {
    pub status: StatusCode,
    pub method: Method,
    pub url: String,
}

impl HttpStatusError {
    pub fn new(status: StatusCode, method: Method, url: impl Into<String>) -> Self {
        Self {
            status,
            method,
            url: url.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl fmt::Display for HttpStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http error: {} {} {}", self.status.as_u16(), self.method, self.url)
    }
}

impl std::error::Error for HttpStatusError {}

/// Status line and headers of a response whose body has been consumed
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub url: Url,
    pub headers: HeaderMap,
}

impl ResponseMeta {
    pub(crate) fn from_response(response: &reqwest::Response) -> Self {
        Self {
            status: response.status(),
            url: response.url().clone(),
            headers: response.headers().clone(),
        }
    }

    /// The `Last-Modified` header, when present and readable
    pub fn last_modified(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
    }
}
