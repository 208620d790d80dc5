// self
use crate::_prelude::*;

/// Extra header forwarded to the mail worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailHeader {
	/// Header name.
	pub name: String,
	/// Header value.
	pub value: String,
}
impl EmailHeader {
	/// Creates a header entry.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: value.into() }
	}
}

/// Everything needed to send one notification.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmailRequest {
	/// Primary recipients.
	pub to: Vec<String>,
	/// Sender override; the configured sender is used when unset.
	pub from: Option<String>,
	/// Carbon-copy recipients; omitted from the payload when unset.
	pub cc: Option<Vec<String>>,
	/// Blind carbon-copy recipients; omitted from the payload when unset.
	pub bcc: Option<Vec<String>>,
	/// Subject line, or an i18n key when [`EmailRequest::translate_subject`] is set.
	pub subject: String,
	/// Template name when parameters are present, otherwise the literal body.
	pub template: String,
	/// Parameters rendered into the template.
	pub template_params: Option<JsonValue>,
	/// Translate the subject through the i18n collaborator.
	pub translate_subject: bool,
	/// Extra headers; omitted from the payload when unset.
	pub headers: Option<Vec<EmailHeader>>,
}
impl EmailRequest {
	/// Creates a request for several recipients.
	pub fn new<I, S>(to: I, subject: impl Into<String>, template: impl Into<String>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			to: to.into_iter().map(Into::into).collect(),
			subject: subject.into(),
			template: template.into(),
			..Default::default()
		}
	}

	/// Creates a request for a single recipient.
	pub fn single(
		to: impl Into<String>,
		subject: impl Into<String>,
		template: impl Into<String>,
	) -> Self {
		let to: String = to.into();

		Self::new([to], subject, template)
	}

	/// Overrides the sender.
	pub fn from(mut self, from: impl Into<String>) -> Self {
		self.from = Some(from.into());

		self
	}

	/// Adds a carbon-copy recipient.
	pub fn cc(mut self, address: impl Into<String>) -> Self {
		self.cc.get_or_insert_with(Vec::new).push(address.into());

		self
	}

	/// Adds a blind carbon-copy recipient.
	pub fn bcc(mut self, address: impl Into<String>) -> Self {
		self.bcc.get_or_insert_with(Vec::new).push(address.into());

		self
	}

	/// Renders [`EmailRequest::template`] as a named template with these parameters.
	pub fn template_params(mut self, params: JsonValue) -> Self {
		self.template_params = Some(params);

		self
	}

	/// Treats the subject as an i18n key.
	pub fn translate_subject(mut self, translate: bool) -> Self {
		self.translate_subject = translate;

		self
	}

	/// Adds a header forwarded to the mail worker.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.get_or_insert_with(Vec::new).push(EmailHeader::new(name, value));

		self
	}
}

/// JSON document handed to the mail worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
	/// Primary recipients.
	pub to: Vec<String>,
	/// Sender address.
	pub from: String,
	/// Carbon-copy recipients.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cc: Option<Vec<String>>,
	/// Blind carbon-copy recipients.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bcc: Option<Vec<String>>,
	/// Final subject line.
	pub subject: String,
	/// Extra headers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub headers: Option<Vec<EmailHeader>>,
	/// Rendered body.
	pub body: String,
}

/// View over the inbound request that triggered a notification.
///
/// Only the URI and headers are needed: they drive host detection, language negotiation, and
/// any request-aware template lookup.
#[derive(Clone, Copy, Debug)]
pub struct RequestHead<'a> {
	/// Request URI.
	pub uri: &'a http::Uri,
	/// Request headers.
	pub headers: &'a HeaderMap,
}
impl<'a> RequestHead<'a> {
	/// Creates a view from its parts.
	pub fn new(uri: &'a http::Uri, headers: &'a HeaderMap) -> Self {
		Self { uri, headers }
	}

	/// Returns the first value of `name`, if it is valid visible ASCII.
	pub fn header(&self, name: impl http::header::AsHeaderName) -> Option<&'a str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// Raw `Accept-Language` header.
	pub fn accept_language(&self) -> Option<&'a str> {
		self.header(header::ACCEPT_LANGUAGE)
	}

	/// Scheme from `X-Forwarded-Proto`, then the request URI, then `http`.
	pub fn scheme(&self) -> &'a str {
		self.header("x-forwarded-proto")
			.and_then(|proto| proto.split(',').next())
			.map(str::trim)
			.filter(|proto| !proto.is_empty())
			.or_else(|| self.uri.scheme_str())
			.unwrap_or("http")
	}

	/// Authority from the `Host` header, then the request URI.
	pub fn authority(&self) -> Option<&'a str> {
		self.header(header::HOST)
			.map(str::trim)
			.filter(|host| !host.is_empty())
			.or_else(|| self.uri.authority().map(|authority| authority.as_str()))
	}
}
impl<'a, B> From<&'a Request<B>> for RequestHead<'a> {
	fn from(request: &'a Request<B>) -> Self {
		Self::new(request.uri(), request.headers())
	}
}
impl<'a> From<&'a http::request::Parts> for RequestHead<'a> {
	fn from(parts: &'a http::request::Parts) -> Self {
		Self::new(&parts.uri, &parts.headers)
	}
}
