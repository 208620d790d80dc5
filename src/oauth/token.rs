//! Token endpoint calls for the authorization-code and client-credentials grants.
//!
//! Requests are `application/x-www-form-urlencoded` POSTs to the configured token path. A
//! `200 OK` answer becomes a [`TokenGrant`] that keeps the provider's JSON intact; any other
//! status surfaces as [`Error::TokenRejected`] carrying the provider body.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use oauth2::{HttpRequest, HttpResponse, basic::BasicTokenResponse};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::OAuthHttpClient,
	oauth::{ACCEPT_JSON_UTF8, AuthorizationCallback, OAuth2Client, TransportErrorMapper},
	obs::{OpKind, OpSpan},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// How the client proves its identity to the token endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuth {
	#[default]
	/// HTTP Basic with `client_id:client_secret`.
	Basic,
	/// `client_id`/`client_secret` appended to the form body.
	RequestBody,
}

/// Successful token endpoint answer.
///
/// The provider's JSON object is kept verbatim; typed accessors read the standard RFC 6749
/// fields on demand.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenGrant(JsonMap<String, JsonValue>);
impl TokenGrant {
	/// Wraps a token endpoint JSON object.
	pub fn new(body: JsonMap<String, JsonValue>) -> Self {
		Self(body)
	}

	/// Issued access token. Callers must avoid logging this string.
	pub fn access_token(&self) -> Option<&str> {
		self.str_field("access_token")
	}

	/// Token type (usually `bearer`).
	pub fn token_type(&self) -> Option<&str> {
		self.str_field("token_type")
	}

	/// Refresh token, when the provider issued one.
	pub fn refresh_token(&self) -> Option<&str> {
		self.str_field("refresh_token")
	}

	/// Granted scope string.
	pub fn scope(&self) -> Option<&str> {
		self.str_field("scope")
	}

	/// Lifetime of the access token; numeric strings are accepted as well.
	pub fn expires_in(&self) -> Option<Duration> {
		let secs = match self.0.get("expires_in")? {
			JsonValue::Number(n) => n.as_i64()?,
			JsonValue::String(s) => s.trim().parse().ok()?,
			_ => return None,
		};

		(secs > 0).then_some(Duration::seconds(secs))
	}

	/// Raw JSON object returned by the provider.
	pub fn raw(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Consumes the grant, returning the raw JSON object.
	pub fn into_raw(self) -> JsonMap<String, JsonValue> {
		self.0
	}

	/// Converts the grant into the standard `oauth2` token response type.
	pub fn typed(&self) -> Result<BasicTokenResponse> {
		serde_path_to_error::deserialize(JsonValue::Object(self.0.clone()))
			.map_err(|source| Error::ResponseParse { source, status: StatusCode::OK.as_u16() })
	}

	/// Renders the grant into the `{"status":"ok","token":{..}}` callback contract.
	pub fn to_json(&self) -> JsonValue {
		json!({ "status": "ok", "token": JsonValue::Object(self.0.clone()) })
	}

	fn str_field(&self, key: &str) -> Option<&str> {
		self.0.get(key).and_then(JsonValue::as_str)
	}
}
impl Debug for TokenGrant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenGrant")
			.field("fields", &self.0.keys().collect::<Vec<_>>())
			.field("token_type", &self.token_type())
			.field("expires_in", &self.expires_in())
			.finish()
	}
}

/// Renders any token operation outcome into the JSON contract handed to callback consumers.
pub fn token_json(result: &Result<TokenGrant>) -> JsonValue {
	match result {
		Ok(grant) => grant.to_json(),
		Err(err) => err.to_json(),
	}
}

impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Completes the authorization-code flow from the provider's redirect parameters using the
	/// configured client authentication.
	pub async fn authorization_code_token(
		&self,
		callback: &AuthorizationCallback,
		expected_state: Option<&str>,
	) -> Result<TokenGrant> {
		self.authorization_code_token_with(callback, expected_state, self.config().client_auth)
			.await
	}

	/// Completes the authorization-code flow with an explicit client authentication mode.
	///
	/// The returned `state` is checked first (when `expected_state` is set), then a provider
	/// `error` short-circuits the exchange, and only then is the code sent to the token
	/// endpoint.
	pub async fn authorization_code_token_with(
		&self,
		callback: &AuthorizationCallback,
		expected_state: Option<&str>,
		auth: ClientAuth,
	) -> Result<TokenGrant> {
		if let Some(expected) = expected_state
			&& callback.state.as_deref() != Some(expected)
		{
			return Err(Error::InvalidState);
		}
		if let Some(error) = &callback.error {
			return Err(Error::Provider {
				error: error.clone(),
				description: callback.error_description.clone(),
			});
		}

		let code = callback.code.as_deref().ok_or_else(|| Error::Provider {
			error: "invalid_request".into(),
			description: Some("Authorization callback carries no code.".into()),
		})?;

		self.get_access_token_with(code, auth).await
	}

	/// Exchanges an authorization code for a token using the configured client authentication.
	pub async fn get_access_token(&self, code: &str) -> Result<TokenGrant> {
		self.get_access_token_with(code, self.config().client_auth).await
	}

	/// Exchanges an authorization code for a token.
	pub async fn get_access_token_with(&self, code: &str, auth: ClientAuth) -> Result<TokenGrant> {
		const KIND: OpKind = OpKind::AuthorizationCode;

		let span = OpSpan::start(KIND, "get_access_token");
		let result = span
			.instrument(async move {
				let config = self.config();
				let mut form = form_urlencoded::Serializer::new(String::new());

				form.append_pair("grant_type", "authorization_code")
					.append_pair("code", code)
					.append_pair("redirect_uri", config.redirect_uri.as_str());

				if auth == ClientAuth::RequestBody {
					form.append_pair("client_id", &config.client_id)
						.append_pair("client_secret", &config.client_secret);
				}

				let request = self.token_request(form.finish(), auth)?;
				let response = self.dispatch(KIND, request).await?;

				map_token_response(response)
			})
			.await;

		span.finish(&result);

		result
	}

	/// Requests an app-only token with the client-credentials grant (Basic authentication).
	///
	/// `scope` is sent only when present and non-blank.
	pub async fn client_credentials_token(&self, scope: Option<&str>) -> Result<TokenGrant> {
		const KIND: OpKind = OpKind::ClientCredentials;

		let span = OpSpan::start(KIND, "client_credentials_token");
		let result = span
			.instrument(async move {
				let mut form = form_urlencoded::Serializer::new(String::new());

				form.append_pair("grant_type", "client_credentials");

				if let Some(scope) = scope.map(str::trim).filter(|scope| !scope.is_empty()) {
					form.append_pair("scope", scope);
				}

				let request = self.token_request(form.finish(), ClientAuth::Basic)?;
				let response = self.dispatch(KIND, request).await?;

				map_token_response(response)
			})
			.await;

		span.finish(&result);

		result
	}

	/// Value of the `Authorization: Basic ..` header for this client.
	pub fn basic_authorization(&self) -> String {
		let config = self.config();
		let credentials = format!("{}:{}", config.client_id, config.client_secret);

		format!("Basic {}", STANDARD.encode(credentials))
	}

	fn token_request(&self, form: String, auth: ClientAuth) -> Result<HttpRequest> {
		let endpoint = self.config().token_endpoint()?;
		let mut builder = http::Request::builder()
			.method(Method::POST)
			.uri(endpoint.as_str())
			.header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(header::ACCEPT, ACCEPT_JSON_UTF8);

		if auth == ClientAuth::Basic {
			builder = builder.header(header::AUTHORIZATION, self.basic_authorization());
		}

		builder.body(form.into_bytes()).map_err(|e| ConfigError::from(e).into())
	}
}

fn map_token_response(response: HttpResponse) -> Result<TokenGrant> {
	let status = response.status();
	let mut de = serde_json::Deserializer::from_slice(response.body());
	let body: JsonMap<String, JsonValue> = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| Error::ResponseParse { source, status: status.as_u16() })?;

	if status == StatusCode::OK {
		Ok(TokenGrant::new(body))
	} else {
		Err(Error::TokenRejected { status: status.as_u16(), body })
	}
}
