//! Transport settings and client TLS identity
//!
//! [`TransportSettings`] is the explicit, locally constructed description of
//! the underlying HTTP stack: pool sizing, timeouts, minimum TLS version and
//! the optional client certificate used for mutual TLS.

use crate::error::TlsError;
use std::time::Duration;

/// Overall per-request timeout applied by every client
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS protocol versions accepted as a floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    /// TLS 1.2 (minimum accepted)
    TLS1_2,
    /// TLS 1.3
    TLS1_3,
}

impl TlsVersion {
    pub fn to_reqwest_version(self) -> reqwest::tls::Version {
        match self {
            TlsVersion::TLS1_2 => reqwest::tls::Version::TLS_1_2,
            TlsVersion::TLS1_3 => reqwest::tls::Version::TLS_1_3,
        }
    }
}

/// A parsed client certificate chain and private key
#[derive(Clone)]
pub struct TlsIdentity {
    certificates: Vec<Vec<u8>>,
    identity: reqwest::Identity,
}

impl TlsIdentity {
    /// Parse a PEM certificate (chain) and PEM private key into an identity
    ///
    /// Fails when either PEM block is missing or malformed, or when the key
    /// is of a type the TLS stack cannot use.
    pub fn from_pem(certificate_pem: &str, key_pem: &str) -> Result<Self, TlsError> {
        let certificates = rustls_pemfile::certs(&mut certificate_pem.as_bytes())
            .map(|cert| cert.map(|der| der.as_ref().to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        if certificates.is_empty() {
            return Err(TlsError::NoCertificate);
        }

        if rustls_pemfile::private_key(&mut key_pem.as_bytes())?.is_none() {
            return Err(TlsError::NoPrivateKey);
        }

        let mut bundle = String::with_capacity(certificate_pem.len() + key_pem.len() + 1);
        bundle.push_str(certificate_pem.trim_end());
        bundle.push('\n');
        bundle.push_str(key_pem);
        let identity = reqwest::Identity::from_pem(bundle.as_bytes()).map_err(TlsError::Identity)?;

        Ok(Self {
            certificates,
            identity,
        })
    }

    /// DER-encoded certificates, leaf first
    pub fn certificates(&self) -> &[Vec<u8>] {
        &self.certificates
    }

    pub(crate) fn reqwest_identity(&self) -> reqwest::Identity {
        self.identity.clone()
    }
}

impl std::fmt::Debug for TlsIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsIdentity")
            .field("certificates", &self.certificates.len())
            .finish_non_exhaustive()
    }
}

/// Settings for the underlying HTTP transport
#[derive(Debug, Clone)]
pub struct TransportSettings {
    /// Overall timeout for one request, connection through body
    pub timeout: Duration,
    /// Timeout for establishing a connection
    pub connect_timeout: Duration,
    /// How long an idle pooled connection is kept
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    pub pool_max_idle_per_host: usize,
    /// Lowest TLS version negotiated
    pub min_tls_version: TlsVersion,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Client certificate presented during the handshake (mutual TLS)
    pub identity: Option<TlsIdentity>,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 100,
            min_tls_version: TlsVersion::TLS1_2,
            user_agent: concat!("icann-client/", env!("CARGO_PKG_VERSION")).to_string(),
            identity: None,
        }
    }
}

impl TransportSettings {
    /// Install a client identity for mutual TLS
    pub fn with_identity(mut self, identity: TlsIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set minimum TLS version
    pub fn with_min_tls_version(mut self, version: TlsVersion) -> Self {
        self.min_tls_version = version;
        self
    }

    pub fn has_client_cert(&self) -> bool {
        self.identity.is_some()
    }

    /// Build a reqwest client from these settings
    pub(crate) fn build_client(&self) -> crate::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .min_tls_version(self.min_tls_version.to_reqwest_version())
            .user_agent(self.user_agent.clone());

        if let Some(identity) = &self.identity {
            builder = builder.identity(identity.reqwest_identity());
        }

        builder.build().map_err(|e| {
            if self.identity.is_some() {
                TlsError::Identity(e).into()
            } else {
                crate::Error::Network(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn self_signed() -> (String, String) {
        let rcgen::CertifiedKey { cert, signing_key } =
            rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        (cert.pem(), signing_key.serialize_pem())
    }

    #[test]
    fn test_settings_default() {
        let settings = TransportSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.min_tls_version, TlsVersion::TLS1_2);
        assert_eq!(settings.pool_max_idle_per_host, 100);
        assert!(settings.user_agent.starts_with("icann-client/"));
        assert!(!settings.has_client_cert());
    }

    #[test]
    fn test_tls_version_ordering() {
        assert!(TlsVersion::TLS1_2 < TlsVersion::TLS1_3);
    }

    #[test]
    fn test_identity_from_generated_pem() {
        let (cert_pem, key_pem) = self_signed();
        let identity = TlsIdentity::from_pem(&cert_pem, &key_pem).unwrap();
        assert_eq!(identity.certificates().len(), 1);

        let settings = TransportSettings::default().with_identity(identity);
        assert!(settings.has_client_cert());
        assert!(settings.build_client().is_ok());
    }

    #[test]
    fn test_identity_rejects_missing_certificate() {
        let (_, key_pem) = self_signed();
        let err = TlsIdentity::from_pem("not a certificate", &key_pem).unwrap_err();
        assert!(matches!(err, TlsError::NoCertificate));
    }

    #[test]
    fn test_identity_rejects_missing_key() {
        let (cert_pem, _) = self_signed();
        let err = TlsIdentity::from_pem(&cert_pem, "not a key").unwrap_err();
        assert!(matches!(err, TlsError::NoPrivateKey));
    }

    #[test]
    fn test_identity_rejects_corrupt_base64() {
        let (_, key_pem) = self_signed();
        let corrupt = "-----BEGIN CERTIFICATE-----\n!!!!\n-----END CERTIFICATE-----\n";
        assert!(TlsIdentity::from_pem(corrupt, &key_pem).is_err());
    }
}
