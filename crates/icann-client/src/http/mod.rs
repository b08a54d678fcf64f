//! HTTP layer: transports, authentication and the base client
//!
//! - [`Transport`] is the round-trip seam; [`HttpTransport`] is the pooled
//!   terminal implementation
//! - [`BasicAuthTransport`] decorates any transport with Basic credentials
//! - mutual TLS is configured through [`TransportSettings`]
//! - [`Client`] resolves paths and runs the JSON envelope

pub mod auth;
pub mod client;
pub mod context;
pub mod tls;
pub mod transport;

pub use auth::{create_transport, BasicAuthTransport};
pub use client::{ApiRequest, Client};
pub use context::RequestContext;
pub use tls::{TlsIdentity, TlsVersion, TransportSettings, DEFAULT_TIMEOUT};
pub use transport::{HttpTransport, Transport};

// Re-export commonly used types
pub use reqwest::{Method, StatusCode};
