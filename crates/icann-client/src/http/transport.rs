//! The round-trip seam between the client and the HTTP stack
//!
//! A [`Transport`] turns a request into a response. [`HttpTransport`] is the
//! terminal implementation backed by a pooled reqwest client; decorators such
//! as [`crate::http::BasicAuthTransport`] wrap another transport and adjust
//! each request before delegating.

use crate::error::{Error, Result};
use crate::http::tls::{TlsIdentity, TransportSettings};
use async_trait::async_trait;
use reqwest::{Request, Response};
use std::fmt;

/// Something that can round-trip HTTP requests
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send a request the caller no longer needs
    async fn send(&self, request: Request) -> Result<Response>;

    /// Send a copy of `request`, leaving the caller's request untouched
    async fn round_trip(&self, request: &Request) -> Result<Response> {
        let owned = request.try_clone().ok_or(Error::UnclonableRequest)?;
        self.send(owned).await
    }

    /// The client identity presented during the TLS handshake, if any
    fn tls_identity(&self) -> Option<&TlsIdentity> {
        None
    }
}

/// Terminal transport over a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    settings: TransportSettings,
}

impl HttpTransport {
    pub fn new(settings: TransportSettings) -> Result<Self> {
        let client = settings.build_client()?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response> {
        Ok(self.client.execute(request).await?)
    }

    fn tls_identity(&self) -> Option<&TlsIdentity> {
        self.settings.identity.as_ref()
    }
}
