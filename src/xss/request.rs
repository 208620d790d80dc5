// crates.io
use serde::de::DeserializeOwned;
use url::form_urlencoded;
// self
use crate::{_prelude::*, xss::sanitize};

/// Inbound request whose parameters, headers, and body are sanitized on read.
#[derive(Debug)]
pub struct XssRequest<B> {
	inner: Request<B>,
}
impl<B> XssRequest<B> {
	/// Wraps `inner`.
	pub fn new(inner: Request<B>) -> Self {
		Self { inner }
	}

	/// Raw request, bypassing sanitization.
	pub fn inner(&self) -> &Request<B> {
		&self.inner
	}

	/// Unwraps the raw request.
	pub fn into_inner(self) -> Request<B> {
		self.inner
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		self.inner.method()
	}

	/// Request URI.
	pub fn uri(&self) -> &http::Uri {
		self.inner.uri()
	}

	/// Raw request headers.
	pub fn headers(&self) -> &HeaderMap {
		self.inner.headers()
	}

	/// Sanitized query parameters in request order.
	pub fn params(&self) -> Vec<(String, String)> {
		self.inner.uri().query().map(sanitized_pairs).unwrap_or_default()
	}

	/// First sanitized value of query parameter `name`.
	pub fn param(&self, name: &str) -> Option<String> {
		let query = self.inner.uri().query()?;

		form_urlencoded::parse(query.as_bytes())
			.find(|(key, _)| key == name)
			.map(|(_, value)| sanitize(&value).into_owned())
	}

	/// First sanitized value of header `name`; `None` when absent or not visible ASCII.
	pub fn header(&self, name: &str) -> Option<String> {
		let value = self.inner.headers().get(name)?.to_str().ok()?;

		Some(sanitize(value).into_owned())
	}

	fn is_form(&self) -> bool {
		self.inner
			.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.split(';').next())
			.is_some_and(|mime| {
				mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded")
			})
	}
}
impl<B> XssRequest<B>
where
	B: AsRef<[u8]>,
{
	/// Body decoded as UTF-8 (invalid sequences replaced) and sanitized.
	pub fn body_text(&self) -> String {
		sanitize(&String::from_utf8_lossy(self.inner.body().as_ref())).into_owned()
	}

	/// Sanitized attributes of a `application/x-www-form-urlencoded` body.
	///
	/// Requests with any other content type yield no attributes.
	pub fn form_attributes(&self) -> Vec<(String, String)> {
		if !self.is_form() {
			return Vec::new();
		}

		sanitized_pairs(&String::from_utf8_lossy(self.inner.body().as_ref()))
	}

	/// JSON body with every string, object key included, sanitized before deserialization.
	pub fn json_body<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(self.inner.body().as_ref());
		let value: JsonValue = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::InvalidRequestBody { source })?;

		serde_path_to_error::deserialize(sanitize_json(value))
			.map_err(|source| Error::InvalidRequestBody { source })
	}
}
impl<B> From<Request<B>> for XssRequest<B> {
	fn from(inner: Request<B>) -> Self {
		Self::new(inner)
	}
}

fn sanitized_pairs(encoded: &str) -> Vec<(String, String)> {
	form_urlencoded::parse(encoded.as_bytes())
		.map(|(key, value)| (sanitize(&key).into_owned(), sanitize(&value).into_owned()))
		.collect()
}

fn sanitize_json(value: JsonValue) -> JsonValue {
	match value {
		JsonValue::String(s) => JsonValue::String(match sanitize(&s) {
			Cow::Borrowed(_) => s,
			Cow::Owned(clean) => clean,
		}),
		JsonValue::Array(items) => JsonValue::Array(items.into_iter().map(sanitize_json).collect()),
		JsonValue::Object(map) => JsonValue::Object(
			map.into_iter()
				.map(|(key, value)| (sanitize(&key).into_owned(), sanitize_json(value)))
				.collect(),
		),
		other => other,
	}
}
