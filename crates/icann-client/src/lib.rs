//! Credential-aware client for the ICANN MOSAPI and RRI APIs
//!
//! A [`Config`] selects the environment, entity, API version and one of two
//! authentication schemes (HTTP Basic or a mutual-TLS client certificate).
//! [`Client::new`] validates it and builds the matching transport chain;
//! endpoint methods live in [`mosapi`] and [`rri`].
//!
//! # Example
//!
//! ```no_run
//! use icann_client::{Client, Config, RequestContext};
//!
//! async fn example() -> icann_client::Result<()> {
//!     let client = Client::new(Config::basic("example", "user", "password"))?;
//!     let state = client.state(&RequestContext::background()).await?;
//!     println!("{} is {}", state.tld, state.status);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod mosapi;
pub mod rri;

pub use config::{ApiVersion, AuthType, Config, Entity, Environment, MOSAPI_OTE_URL, MOSAPI_URL};
pub use error::{ConfigError, Error, HttpStatusError, ResponseMeta, Result, TlsError};
pub use http::{Client, RequestContext, Transport, TransportSettings};
pub use rri::{EscrowReportStatus, EscrowStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Date layout used in paths and query strings
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
