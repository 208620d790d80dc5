//! Crate-level error types shared by the OAuth client, the email helper, and the XSS decorator.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Every variant renders into the `{"error": ..}` JSON contract through [`Error::to_json`], except
/// [`Error::TokenRejected`] which echoes the provider body with an added `statusCode` field.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Email payload could not be handed to the mail collaborator.
	#[error(transparent)]
	Dispatch(#[from] DispatchError),

	/// Returned `state` does not match the value issued with the authorization redirect.
	#[error("Authorization state does not match the expected value.")]
	InvalidState,
	/// Provider redirected back with an OAuth `error` parameter.
	#[error("Provider returned an authorization error: {error}.")]
	Provider {
		/// Provider-supplied OAuth `error` value.
		error: String,
		/// Provider-supplied `error_description`, if any.
		description: Option<String>,
	},
	/// Token endpoint answered with a non-200 status.
	#[error("Token endpoint rejected the request with HTTP {status}.")]
	TokenRejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// JSON object returned by the token endpoint.
		body: JsonMap<String, JsonValue>,
	},
	/// Upstream responded with a body that is not the expected JSON.
	#[error("Upstream returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Inbound request body is not valid JSON.
	#[error("Request body is not valid JSON.")]
	InvalidRequestBody {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Email body is missing because the template could not be rendered.
	#[error("Message is null.")]
	MessageMissing {
		/// Rendering failure that left the body empty.
		#[source]
		source: Option<crate::email::RenderError>,
	},
}
impl Error {
	/// Returns the value exposed through the `error` field of [`Error::to_json`].
	pub fn error_code(&self) -> Cow<'_, str> {
		match self {
			Self::InvalidState => Cow::Borrowed("invalid_state"),
			Self::Provider { error, .. } => Cow::Borrowed(error.as_str()),
			Self::TokenRejected { body, .. } => body
				.get("error")
				.and_then(JsonValue::as_str)
				.map(Cow::Borrowed)
				.unwrap_or_else(|| Cow::Owned(self.to_string())),
			other => Cow::Owned(other.to_string()),
		}
	}

	/// Renders the error into the JSON contract handed back to callers.
	pub fn to_json(&self) -> JsonValue {
		match self {
			Self::TokenRejected { status, body } => {
				let mut body = body.clone();

				body.insert("statusCode".into(), JsonValue::from(*status));

				JsonValue::Object(body)
			},
			other => json!({ "error": other.error_code() }),
		}
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Base URI cannot be parsed.
	#[error("Base URI is invalid.")]
	InvalidBaseUri {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URI uses a scheme other than `http` or `https`.
	#[error("Base URI must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Base URI has no host component.
	#[error("Base URI must include a host.")]
	MissingHost,
	/// Client identifier is empty.
	#[error("Client identifier cannot be empty.")]
	MissingClientId,
	/// Redirect URI cannot be parsed.
	#[error("Redirect URI is invalid.")]
	InvalidRedirect {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint path cannot be resolved against the base URI.
	#[error("Path `{path}` cannot be resolved against the base URI.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name or value is not valid HTTP.
	#[error("Header `{name}` is not a valid HTTP header.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Configuration document does not match the expected shape.
	#[error("Configuration document is malformed.")]
	Malformed {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Shared server configuration is not a JSON object.
	#[error("Shared email configuration is not valid JSON.")]
	InvalidSharedConfig {
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// The client was closed and no longer accepts requests.
	#[error("OAuth client has been closed.")]
	ClientClosed,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the upstream endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the upstream endpoint.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a structured source.
	#[error("HTTP client error occurred while calling the upstream endpoint: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures raised while handing an email payload to the mail bus.
#[derive(Debug, ThisError)]
pub enum DispatchError {
	/// No consumer is listening on the bus address anymore.
	#[error("Mail bus `{address}` is closed.")]
	BusClosed {
		/// Bus address the payload was published to.
		address: String,
	},
	/// The consumer dropped the message without replying.
	#[error("Mail bus `{address}` dropped the message without a reply.")]
	NoReply {
		/// Bus address the payload was published to.
		address: String,
	},
	/// The email payload could not be serialized.
	#[error("Email payload could not be serialized.")]
	Payload(#[from] serde_json::Error),
}
