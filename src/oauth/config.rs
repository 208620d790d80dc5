//! Client configuration with serde defaults and a validating builder.

// crates.io
use oauth2::{ClientId, ClientSecret};
// self
use crate::{_prelude::*, error::ConfigError, http::PoolSettings, oauth::ClientAuth};

/// Default authorization endpoint path.
pub const DEFAULT_AUTHORIZE_PATH: &str = "/oauth2/auth";
/// Default token endpoint path.
pub const DEFAULT_TOKEN_PATH: &str = "/oauth2/token";

/// Immutable client configuration consumed by [`OAuth2Client`](crate::oauth::OAuth2Client).
///
/// Deserializing applies the same defaults as [`OAuth2ClientConfig::builder`]; call
/// [`OAuth2ClientConfig::validate`] afterwards when the values come from an untrusted source.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2ClientConfig {
	/// Scheme, host, and port of the provider.
	pub base_uri: Url,
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// Client secret used for Basic or body client authentication.
	#[serde(default, skip_serializing)]
	pub client_secret: String,
	/// Path of the authorization endpoint, resolved against `base_uri`.
	#[serde(default = "default_authorize_path")]
	pub authorize_path: String,
	/// Path of the token endpoint, resolved against `base_uri`.
	#[serde(default = "default_token_path")]
	pub token_path: String,
	/// Redirect URI registered with the provider, sent exactly as configured.
	pub redirect_uri: String,
	/// Client authentication used by the authorization code exchange unless overridden.
	#[serde(default)]
	pub client_auth: ClientAuth,
	/// Connection pool settings for the default transport.
	#[serde(flatten)]
	pub pool: PoolSettings,
}
impl OAuth2ClientConfig {
	/// Creates a new builder for the provided provider base URI.
	pub fn builder(base_uri: Url) -> OAuth2ClientConfigBuilder {
		OAuth2ClientConfigBuilder::new(base_uri)
	}

	/// Parses a JSON document and validates the result.
	pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(raw);
		let config: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::Malformed { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Validates invariants for the configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.base_uri.scheme() {
			"http" | "https" => (),
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
		}

		if self.base_uri.host_str().is_none_or(str::is_empty) {
			return Err(ConfigError::MissingHost);
		}
		if self.client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}

		Url::parse(&self.redirect_uri).map_err(|source| ConfigError::InvalidRedirect { source })?;

		self.endpoint(&self.authorize_path)?;
		self.endpoint(&self.token_path)?;

		Ok(())
	}

	/// Resolves a path (or absolute URL) against the provider base URI.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_uri
			.join(path)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}

	/// Authorization endpoint URL.
	pub fn authorize_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.authorize_path)
	}

	/// Token endpoint URL.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.token_path)
	}

	/// Client identifier as the `oauth2` newtype.
	pub fn oauth_client_id(&self) -> ClientId {
		ClientId::new(self.client_id.clone())
	}

	/// Client secret as the redacting `oauth2` newtype.
	pub fn oauth_client_secret(&self) -> ClientSecret {
		ClientSecret::new(self.client_secret.clone())
	}
}
impl Debug for OAuth2ClientConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2ClientConfig")
			.field("base_uri", &self.base_uri)
			.field("client_id", &self.client_id)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.field("authorize_path", &self.authorize_path)
			.field("token_path", &self.token_path)
			.field("redirect_uri", &self.redirect_uri)
			.field("client_auth", &self.client_auth)
			.field("pool", &self.pool)
			.finish()
	}
}

fn default_authorize_path() -> String {
	DEFAULT_AUTHORIZE_PATH.into()
}

fn default_token_path() -> String {
	DEFAULT_TOKEN_PATH.into()
}

/// Builder for [`OAuth2ClientConfig`] values.
#[derive(Debug)]
pub struct OAuth2ClientConfigBuilder {
	base_uri: Url,
	client_id: Option<String>,
	client_secret: Option<ClientSecret>,
	authorize_path: String,
	token_path: String,
	redirect_uri: Option<String>,
	client_auth: ClientAuth,
	pool: PoolSettings,
}
impl OAuth2ClientConfigBuilder {
	/// Creates a new builder seeded with the provider base URI and default endpoint paths.
	pub fn new(base_uri: Url) -> Self {
		Self {
			base_uri,
			client_id: None,
			client_secret: None,
			authorize_path: default_authorize_path(),
			token_path: default_token_path(),
			redirect_uri: None,
			client_auth: ClientAuth::default(),
			pool: PoolSettings::default(),
		}
	}

	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
		self.client_secret = Some(ClientSecret::new(secret.into()));

		self
	}

	/// Overrides the authorization endpoint path.
	pub fn authorize_path(mut self, path: impl Into<String>) -> Self {
		self.authorize_path = path.into();

		self
	}

	/// Overrides the token endpoint path.
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.token_path = path.into();

		self
	}

	/// Sets the redirect URI registered with the provider.
	pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
		self.redirect_uri = Some(uri.into());

		self
	}

	/// Overrides the default client authentication for code exchanges.
	pub fn client_auth(mut self, auth: ClientAuth) -> Self {
		self.client_auth = auth;

		self
	}

	/// Overrides the maximum pool size of the default transport.
	pub fn pool_size(mut self, pool_size: usize) -> Self {
		self.pool.pool_size = pool_size;

		self
	}

	/// Enables or disables connection reuse on the default transport.
	pub fn keep_alive(mut self, keep_alive: bool) -> Self {
		self.pool.keep_alive = keep_alive;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<OAuth2ClientConfig, ConfigError> {
		let client_id = self.client_id.ok_or(ConfigError::MissingClientId)?;
		let config = OAuth2ClientConfig {
			base_uri: self.base_uri,
			client_id,
			client_secret: self.client_secret.map(|s| s.secret().to_owned()).unwrap_or_default(),
			authorize_path: self.authorize_path,
			token_path: self.token_path,
			redirect_uri: self.redirect_uri.unwrap_or_default(),
			client_auth: self.client_auth,
			pool: self.pool,
		};

		config.validate()?;

		Ok(config)
	}
}
