//! Base client shared by the MOSAPI and RRI endpoint methods
//!
//! Owns the transport chain chosen at construction, the environment's base
//! URL and a validated copy of the configuration. Endpoint methods are thin
//! callers of [`Client::execute_json`] and [`Client::execute`].

use crate::config::Config;
use crate::error::{Error, HttpStatusError, ResponseMeta, Result};
use crate::http::auth::create_transport;
use crate::http::context::RequestContext;
use crate::http::tls::TransportSettings;
use crate::http::transport::Transport;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

const APPLICATION_JSON: &str = "application/json";

/// A request bound to the context it was built with
#[derive(Debug)]
pub struct ApiRequest {
    request: Request,
    context: RequestContext,
}

impl ApiRequest {
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn url(&self) -> &Url {
        self.request.url()
    }

    pub fn headers(&self) -> &reqwest::header::HeaderMap {
        self.request.headers()
    }

    pub fn headers_mut(&mut self) -> &mut reqwest::header::HeaderMap {
        self.request.headers_mut()
    }

    /// Effective timeout, already capped by the context deadline
    pub fn timeout(&self) -> Option<&Duration> {
        self.request.timeout()
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

/// Credential-aware client for the ICANN APIs
///
/// Safe to share across concurrent requests. The only mutation after
/// construction is [`Client::set_base_url`], which needs exclusive access.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    base_url: Url,
    config: Config,
    timeout: Duration,
}

impl Client {
    /// Validate `config` and build a client with default transport settings
    pub fn new(config: Config) -> Result<Self> {
        Self::with_settings(config, TransportSettings::default())
    }

    pub fn with_settings(config: Config, settings: TransportSettings) -> Result<Self> {
        let config = config.with_defaults();
        config.validate()?;
        let timeout = settings.timeout;
        let transport = create_transport(&config, settings)?;
        Self::assemble(config, transport, timeout)
    }

    /// Build a client around a caller-supplied transport
    ///
    /// The configuration is still defaulted and validated, but no
    /// authentication is layered onto `transport`.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let config = config.with_defaults();
        config.validate()?;
        Self::assemble(config, transport, crate::http::tls::DEFAULT_TIMEOUT)
    }

    fn assemble(config: Config, transport: Arc<dyn Transport>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(config.environment().base_url())?;
        Ok(Self {
            transport,
            base_url,
            config,
            timeout,
        })
    }

    /// Resolve `path` and bind the request to `ctx`
    ///
    /// An absolute URL is used as is; anything else is resolved against the
    /// base URL, so a leading `/` replaces the base path.
    pub fn build_request(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ApiRequest> {
        let url = match Url::parse(path) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base_url.join(path)?,
            Err(err) => return Err(err.into()),
        };

        let mut request = Request::new(method, url);
        *request.timeout_mut() = Some(ctx.effective_timeout(self.timeout));
        if let Some(body) = body {
            *request.body_mut() = Some(body.into());
        }

        Ok(ApiRequest {
            request,
            context: ctx.clone(),
        })
    }

    /// Send through the transport chain and return the raw response
    ///
    /// Network errors come back unchanged; the status code is not inspected.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        if request.context.is_cancelled() {
            return Err(Error::Cancelled);
        }

        debug!(method = %request.method(), url = %request.url(), "sending request");

        let send = self.transport.round_trip(&request.request);
        let response = match request.context.cancellation() {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(Error::Cancelled),
                result = send => result?,
            },
            None => send.await?,
        };

        debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "received response"
        );
        Ok(response)
    }

    /// Generic JSON request/response envelope
    ///
    /// Encodes `input` when given, always asks for JSON, and decodes the body
    /// into `output` on 2xx. An empty (or whitespace-only) body leaves
    /// `output` untouched. Non-2xx responses are drained and reported as
    /// [`Error::Status`].
    pub async fn execute_json<I, O>(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        input: Option<&I>,
        output: Option<&mut O>,
    ) -> Result<ResponseMeta>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let body = input
            .map(serde_json::to_vec)
            .transpose()
            .map_err(Error::Encode)?;
        let has_body = body.is_some();

        let mut request = self.build_request(ctx, method, path, body)?;
        let headers = request.headers_mut();
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }

        let response = self.execute(&request).await?;
        let meta = ResponseMeta::from_response(&response);

        if !meta.status.is_success() {
            // Drain so the connection can go back to the pool
            let _ = response.bytes().await;
            return Err(HttpStatusError::new(
                meta.status,
                request.method().clone(),
                request.url().as_str(),
            )
            .into());
        }

        let Some(output) = output else {
            return Ok(meta);
        };

        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(meta);
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                *output = value;
                Ok(meta)
            }
            Err(source) => Err(Error::Decode {
                source,
                response: meta,
            }),
        }
    }

    /// GET `path` and decode the body, starting from `O::default()`
    pub async fn get_json<O>(&self, ctx: &RequestContext, path: &str) -> Result<(O, ResponseMeta)>
    where
        O: DeserializeOwned + Default,
    {
        let mut out = O::default();
        let meta = self
            .execute_json(ctx, Method::GET, path, None::<&()>, Some(&mut out))
            .await?;
        Ok((out, meta))
    }

    /// Point the client at another server, typically a test double
    pub fn set_base_url(&mut self, raw: &str) -> Result<()> {
        self.base_url = Url::parse(raw)?;
        Ok(())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A copy of the validated configuration
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
