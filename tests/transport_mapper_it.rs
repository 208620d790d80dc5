// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	pin::Pin,
	sync::Arc,
};
// crates.io
use parking_lot::Mutex;
// self
use webutils::{
	error::{Error, TransportError},
	http::OAuthHttpClient,
	obs::OpKind,
	oauth::{
		OAuth2Client, OAuth2ClientConfig, TransportErrorMapper, map_generic_error,
		oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse},
	},
	url::Url,
};

#[derive(Debug)]
enum FakeTransportError {
	Refused,
}
impl Display for FakeTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Refused => write!(f, "Connection refused."),
		}
	}
}
impl StdError for FakeTransportError {}

#[derive(Clone, Default)]
struct FakeHttpClient {
	seen: Arc<Mutex<Vec<HttpRequest>>>,
}
impl OAuthHttpClient for FakeHttpClient {
	type Handle = FakeHttpHandle;
	type TransportError = FakeTransportError;

	fn handle(&self) -> Self::Handle {
		FakeHttpHandle { seen: self.seen.clone() }
	}
}

struct FakeHttpHandle {
	seen: Arc<Mutex<Vec<HttpRequest>>>,
}
impl<'a> AsyncHttpClient<'a> for FakeHttpHandle {
	type Error = HttpClientError<FakeTransportError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'a + Send + Sync>>;

	fn call(&'a self, request: HttpRequest) -> Self::Future {
		let seen = self.seen.clone();

		Box::pin(async move {
			seen.lock().push(request);

			Err(HttpClientError::Reqwest(Box::new(FakeTransportError::Refused)))
		})
	}
}

#[derive(Clone, Default)]
struct RecordingTransportErrorMapper {
	kinds: Arc<Mutex<Vec<OpKind>>>,
}
impl TransportErrorMapper<FakeTransportError> for RecordingTransportErrorMapper {
	fn map_transport_error(&self, kind: OpKind, err: HttpClientError<FakeTransportError>) -> Error {
		self.kinds.lock().push(kind);

		map_generic_error(err)
	}
}

fn build_client(
	http_client: FakeHttpClient,
	mapper: RecordingTransportErrorMapper,
) -> OAuth2Client<FakeHttpClient, RecordingTransportErrorMapper> {
	let config = OAuth2ClientConfig::builder(
		Url::parse("https://auth.example.com/base/").expect("Base URI fixture should parse."),
	)
	.client_id("portal")
	.client_secret("s3cret")
	.redirect_uri("https://app.example.com/callback")
	.build()
	.expect("Client configuration should build.");

	OAuth2Client::with_http_client(config, http_client, mapper)
}

#[tokio::test]
async fn transport_failures_flow_through_the_mapper() {
	let http_client = FakeHttpClient::default();
	let mapper = RecordingTransportErrorMapper::default();
	let client = build_client(http_client.clone(), mapper.clone());
	let err = client
		.client_credentials_token(Some("read"))
		.await
		.expect_err("Refused connections must fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
	assert_eq!(
		err.to_json(),
		serde_json::json!({ "error": "Network error occurred while calling the upstream endpoint." })
	);

	let _ = client.get_protected_resource("notes", "at-1").await;

	assert_eq!(*mapper.kinds.lock(), [OpKind::ClientCredentials, OpKind::ProtectedResource]);

	let seen = http_client.seen.lock();

	assert_eq!(seen.len(), 2);
	assert_eq!(seen[0].uri(), "https://auth.example.com/oauth2/token");
	assert_eq!(seen[1].uri(), "https://auth.example.com/base/notes");
}

#[tokio::test]
async fn closed_client_never_reaches_the_transport() {
	let http_client = FakeHttpClient::default();
	let client = build_client(http_client.clone(), RecordingTransportErrorMapper::default());

	client.close();

	let err = client
		.get_protected_resource("/notes", "at-1")
		.await
		.expect_err("Closed clients must refuse calls.");

	assert_eq!(err.to_json(), serde_json::json!({ "error": "OAuth client has been closed." }));
	assert!(http_client.seen.lock().is_empty());
}
