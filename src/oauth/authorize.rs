// crates.io
use rand::{Rng, distr::Alphanumeric};
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::OAuthHttpClient,
	oauth::{OAuth2Client, TransportErrorMapper},
	obs::{OpKind, OpSpan},
};

const STATE_LEN: usize = 32;

/// Generates an opaque anti-CSRF `state` value for an authorization redirect.
pub fn generate_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}

/// Query parameters the provider sends back to the redirect URI.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorizationCallback {
	/// `state` echoed by the provider.
	pub state: Option<String>,
	/// Authorization code to exchange for a token.
	pub code: Option<String>,
	/// OAuth `error` reported by the provider.
	pub error: Option<String>,
	/// OAuth `error_description` reported by the provider.
	pub error_description: Option<String>,
}
impl AuthorizationCallback {
	/// Extracts callback parameters from a raw query string; the first occurrence of a key wins.
	pub fn from_query(query: &str) -> Self {
		let mut callback = Self::default();

		for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
			let slot = match key.as_ref() {
				"state" => &mut callback.state,
				"code" => &mut callback.code,
				"error" => &mut callback.error,
				"error_description" => &mut callback.error_description,
				_ => continue,
			};

			if slot.is_none() {
				*slot = Some(value.into_owned());
			}
		}

		callback
	}

	/// Extracts callback parameters from the redirect request URI.
	pub fn from_uri(uri: &http::Uri) -> Self {
		uri.query().map(Self::from_query).unwrap_or_default()
	}
}
impl Debug for AuthorizationCallback {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorizationCallback")
			.field("state", &self.state)
			.field("code_present", &self.code.is_some())
			.field("error", &self.error)
			.field("error_description", &self.error_description)
			.finish()
	}
}

impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the authorization endpoint URL the user agent should be sent to.
	///
	/// The `scope` parameter is omitted when `scope` is `None` or blank.
	pub fn authorize_url(&self, state: &str, scope: Option<&str>) -> Result<Url> {
		let span = OpSpan::start(OpKind::Authorize, "authorize_url");
		let result = span.in_scope(|| -> Result<Url> {
			let config = self.config();
			let mut url = config.authorize_endpoint()?;
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("response_type", "code");
			pairs.append_pair("client_id", &config.client_id);
			pairs.append_pair("state", state);
			pairs.append_pair("redirect_uri", &config.redirect_uri);

			if let Some(scope) = scope.map(str::trim).filter(|scope| !scope.is_empty()) {
				pairs.append_pair("scope", scope);
			}

			drop(pairs);

			Ok(url)
		});

		span.finish(&result);

		result
	}

	/// Builds a `302 Found` response redirecting the user agent to the authorization endpoint.
	pub fn authorize_redirect(
		&self,
		state: &str,
		scope: Option<&str>,
	) -> Result<http::Response<()>> {
		let url = self.authorize_url(state, scope)?;
		let response = http::Response::builder()
			.status(StatusCode::FOUND)
			.header(header::LOCATION, url.as_str())
			.body(())
			.map_err(ConfigError::from)?;

		Ok(response)
	}
}
