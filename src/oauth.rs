//! OAuth 2.0 client for a single provider.
//!
//! [`OAuth2Client`] covers the authorization-code and client-credentials grants plus
//! Bearer-authenticated CRUD helpers for protected resources. Each helper performs exactly one
//! HTTP call through the pluggable [`OAuthHttpClient`] transport and maps the answer into either
//! a typed value or an [`Error`] whose [`Error::to_json`] form keeps the `{"error": ..}`
//! contract expected by callback-style consumers.

pub use oauth2;

pub mod config;

mod authorize;
mod resource;
mod token;
mod transport;

pub use authorize::*;
pub use config::{OAuth2ClientConfig, OAuth2ClientConfigBuilder};
pub use resource::*;
pub use token::*;
pub use transport::*;

// std
use std::sync::atomic::{AtomicBool, Ordering};
// crates.io
use oauth2::{AsyncHttpClient, HttpRequest, HttpResponse};
// self
use crate::{_prelude::*, error::ConfigError, http::OAuthHttpClient, obs::OpKind};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

/// `Accept` value sent with token requests and, by default, protected-resource calls.
pub const ACCEPT_JSON_UTF8: &str = "application/json; charset=UTF-8";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestOAuth2Client = OAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Coordinates OAuth 2.0 calls against a single provider.
///
/// The client owns the transport, the transport error mapper, and the validated configuration
/// (endpoints, client credentials, redirect URI) read once at construction.
#[derive(Clone)]
pub struct OAuth2Client<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	config: OAuth2ClientConfig,
	closed: Arc<AtomicBool>,
}
impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: OAuth2ClientConfig,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			closed: Default::default(),
		}
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &OAuth2ClientConfig {
		&self.config
	}

	/// Stops accepting new calls; every clone of the client observes the closed state.
	pub fn close(&self) {
		self.closed.store(true, Ordering::Release);
	}

	/// Returns true once [`OAuth2Client::close`] has been called.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}

	fn ensure_open(&self) -> Result<(), ConfigError> {
		if self.is_closed() { Err(ConfigError::ClientClosed) } else { Ok(()) }
	}

	/// Sends one request through the transport and maps transport failures.
	pub(crate) async fn dispatch(
		&self,
		kind: OpKind,
		request: HttpRequest,
	) -> Result<HttpResponse> {
		self.ensure_open()?;

		let handle = self.http_client.handle();

		handle
			.call(request)
			.await
			.map_err(|err| self.transport_mapper.map_transport_error(kind, err))
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a new client that provisions its own reqwest-backed transport from the pool
	/// settings in `config`.
	pub fn new(config: OAuth2ClientConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_settings(config.pool)?;

		Ok(Self::with_http_client(config, http_client, Arc::new(ReqwestTransportErrorMapper)))
	}
}
impl<C, M> Debug for OAuth2Client<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Client")
			.field("config", &self.config)
			.field("closed", &self.is_closed())
			.finish()
	}
}
