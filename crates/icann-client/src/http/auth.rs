//! Authentication transports
//!
//! Supports the two schemes the ICANN APIs accept:
//! - HTTP Basic, injected per request by [`BasicAuthTransport`]
//! - mutual TLS, installed once into the transport's TLS settings

use crate::config::{AuthType, Config};
use crate::error::Result;
use crate::http::tls::{TlsIdentity, TransportSettings};
use crate::http::transport::{HttpTransport, Transport};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Request, Response};
use std::fmt;
use std::sync::Arc;

/// Decorator that adds an HTTP Basic `Authorization` header to every request
///
/// Holds only the pre-encoded credentials, so one instance can serve any
/// number of concurrent requests.
#[derive(Clone)]
pub struct BasicAuthTransport<T> {
    username: String,
    authorization: HeaderValue,
    inner: T,
}

impl<T: Transport> BasicAuthTransport<T> {
    pub fn new(username: &str, password: &str, inner: T) -> Result<Self> {
        let encoded = STANDARD.encode(format!("{}:{}", username, password));
        let mut authorization = HeaderValue::from_str(&format!("Basic {}", encoded))?;
        authorization.set_sensitive(true);

        Ok(Self {
            username: username.to_string(),
            authorization,
            inner,
        })
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for BasicAuthTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthTransport")
            .field("username", &self.username)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Transport> Transport for BasicAuthTransport<T> {
    async fn send(&self, mut request: Request) -> Result<Response> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.authorization.clone());
        self.inner.send(request).await
    }

    fn tls_identity(&self) -> Option<&TlsIdentity> {
        self.inner.tls_identity()
    }
}

/// Build the transport chain for a validated configuration
///
/// `basic` wraps the HTTP transport in a [`BasicAuthTransport`]; `tlsa`
/// parses the PEM pair and installs it into the TLS settings; an unset auth
/// type yields the bare transport.
pub fn create_transport(config: &Config, settings: TransportSettings) -> Result<Arc<dyn Transport>> {
    match config.auth_type {
        Some(AuthType::Basic) => {
            let inner = HttpTransport::new(settings)?;
            Ok(Arc::new(BasicAuthTransport::new(
                &config.username,
                &config.password,
                inner,
            )?))
        }
        Some(AuthType::Tlsa) => {
            let identity = TlsIdentity::from_pem(&config.certificate_pem, &config.key_pem)?;
            Ok(Arc::new(HttpTransport::new(settings.with_identity(identity))?))
        }
        None => Ok(Arc::new(HttpTransport::new(settings)?)),
    }
}
