//! Bearer-authenticated calls to protected resources.

// crates.io
use oauth2::{HttpRequest, HttpResponse};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{self as transport, OAuthHttpClient},
	oauth::{ACCEPT_JSON_UTF8, OAuth2Client, TransportErrorMapper},
	obs::{OpKind, OpSpan},
};

/// Description of a single protected-resource call.
///
/// `Accept` defaults to `application/json; charset=UTF-8`. An `Accept` entry passed through
/// [`ProtectedRequest::header`] or [`ProtectedRequest::headers`] replaces that default; every
/// other custom header is appended after `Authorization` and `Accept`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectedRequest {
	method: Method,
	path: String,
	accept: String,
	headers: Vec<(String, String)>,
	body: Option<Vec<u8>>,
}
impl ProtectedRequest {
	/// Creates a request for `path`, resolved against the provider base URI.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			accept: ACCEPT_JSON_UTF8.into(),
			headers: Vec::new(),
			body: None,
		}
	}

	/// `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Overrides the `Accept` MIME type.
	pub fn accept(mut self, mime: impl Into<String>) -> Self {
		self.accept = mime.into();

		self
	}

	/// Adds a custom header; `Accept` overrides the accepted MIME type instead.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();
		let value = value.into();

		if name.eq_ignore_ascii_case(header::ACCEPT.as_str()) {
			self.accept = value;
		} else {
			self.headers.push((name, value));
		}

		self
	}

	/// Adds several custom headers at once.
	pub fn headers<I, K, V>(self, headers: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		headers.into_iter().fold(self, |request, (name, value)| request.header(name, value))
	}

	/// Attaches a request body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// HTTP method of the call.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Path (or absolute URL) of the call.
	pub fn path(&self) -> &str {
		&self.path
	}

	fn into_http(self, endpoint: Url, access_token: &str) -> Result<HttpRequest> {
		let mut builder = http::Request::builder()
			.method(self.method)
			.uri(endpoint.as_str())
			.header(header::AUTHORIZATION, format!("Bearer {access_token}"))
			.header(header::ACCEPT, self.accept.as_str());

		for (name, value) in &self.headers {
			let name = http::HeaderName::from_bytes(name.as_bytes())
				.map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;
			let value = HeaderValue::from_str(value)
				.map_err(|_| ConfigError::InvalidHeader { name: name.to_string() })?;

			builder = builder.header(name, value);
		}

		builder.body(self.body.unwrap_or_default()).map_err(|e| ConfigError::from(e).into())
	}
}

/// Response returned by a protected resource, passed through untouched.
#[derive(Debug)]
pub struct ProtectedResponse(HttpResponse);
impl ProtectedResponse {
	/// HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.0.status()
	}

	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.0.status().is_success()
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		self.0.headers()
	}

	/// Raw response body.
	pub fn body(&self) -> &[u8] {
		self.0.body()
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(self.0.body())
	}

	/// Body deserialized from JSON.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(self.0.body());

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::ResponseParse { source, status: self.0.status().as_u16() })
	}

	/// `Retry-After` hint, if the resource sent one.
	pub fn retry_after(&self) -> Option<Duration> {
		transport::parse_retry_after(self.0.headers())
	}

	/// Consumes the wrapper, returning the transport response.
	pub fn into_inner(self) -> HttpResponse {
		self.0
	}
}
impl From<HttpResponse> for ProtectedResponse {
	fn from(response: HttpResponse) -> Self {
		Self(response)
	}
}

impl<C, M> OAuth2Client<C, M>
where
	C: ?Sized + OAuthHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// `GET`s a protected resource with the default `Accept` header.
	pub async fn get_protected_resource(
		&self,
		path: &str,
		access_token: &str,
	) -> Result<ProtectedResponse> {
		self.send_protected_resource(ProtectedRequest::get(path), access_token).await
	}

	/// `POST`s `body` to a protected resource with the default `Accept` header.
	pub async fn post_protected_resource(
		&self,
		path: &str,
		access_token: &str,
		body: impl Into<Vec<u8>>,
	) -> Result<ProtectedResponse> {
		self.send_protected_resource(ProtectedRequest::post(path).body(body), access_token).await
	}

	/// `PUT`s `body` to a protected resource with the default `Accept` header.
	pub async fn put_protected_resource(
		&self,
		path: &str,
		access_token: &str,
		body: impl Into<Vec<u8>>,
	) -> Result<ProtectedResponse> {
		self.send_protected_resource(ProtectedRequest::put(path).body(body), access_token).await
	}

	/// `DELETE`s a protected resource with the default `Accept` header.
	pub async fn delete_protected_resource(
		&self,
		path: &str,
		access_token: &str,
	) -> Result<ProtectedResponse> {
		self.send_protected_resource(ProtectedRequest::delete(path), access_token).await
	}

	/// Sends an arbitrary protected-resource request with `Authorization: Bearer <token>`.
	///
	/// Any HTTP status is returned as-is; only transport and request-construction failures
	/// become errors.
	pub async fn send_protected_resource(
		&self,
		request: ProtectedRequest,
		access_token: &str,
	) -> Result<ProtectedResponse> {
		const KIND: OpKind = OpKind::ProtectedResource;

		let span = OpSpan::start(KIND, "send_protected_resource");
		let result = span
			.instrument(async move {
				let endpoint = self.config().endpoint(request.path())?;
				let request = request.into_http(endpoint, access_token)?;
				let response = self.dispatch(KIND, request).await?;

				Ok(ProtectedResponse::from(response))
			})
			.await;

		span.finish(&result);

		result
	}
}
