// self
use webutils::{
	_preludet::*,
	oauth::{AuthorizationCallback, OAuth2ClientConfig},
};

fn build_client(redirect_uri: &str) -> ReqwestTestClient {
	let config = OAuth2ClientConfig::builder(
		Url::parse("https://auth.example.com").expect("Base URI fixture should parse."),
	)
	.client_id("portal")
	.client_secret("s3cret")
	.redirect_uri(redirect_uri)
	.build()
	.expect("Client configuration should build.");

	build_reqwest_test_client(config)
}

#[test]
fn authorize_url_carries_code_request_parameters() {
	let client = build_client("https://app.example.com/cb?x=1");
	let url = client
		.authorize_url("xyz", Some("read write"))
		.expect("Authorization URL should build.");

	assert_eq!(
		url.as_str(),
		"https://auth.example.com/oauth2/auth?response_type=code&client_id=portal&state=xyz\
		 &redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb%3Fx%3D1&scope=read+write"
	);

	let url = client.authorize_url("xyz", Some("  ")).expect("Authorization URL should build.");

	assert!(url.query_pairs().all(|(key, _)| key != "scope"));
	assert_eq!(url.query_pairs().count(), 4);

	let url = client.authorize_url("xyz", None).expect("Authorization URL should build.");

	assert!(url.query_pairs().all(|(key, _)| key != "scope"));
}

#[test]
fn authorize_url_sends_redirect_uri_as_configured() {
	let client = build_client("https://app.example.com");
	let url = client.authorize_url("s", None).expect("Authorization URL should build.");
	let redirect = url
		.query_pairs()
		.find(|(key, _)| key == "redirect_uri")
		.map(|(_, value)| value.into_owned());

	assert_eq!(redirect.as_deref(), Some("https://app.example.com"));
}

#[test]
fn authorize_redirect_is_a_found_response() {
	let client = build_client("https://app.example.com/cb");
	let response =
		client.authorize_redirect("xyz", Some("profile")).expect("Redirect should build.");
	let location = response
		.headers()
		.get(header::LOCATION)
		.and_then(|value| value.to_str().ok())
		.expect("Redirect should carry a Location header.");

	assert_eq!(response.status(), StatusCode::FOUND);
	assert_eq!(
		location,
		client.authorize_url("xyz", Some("profile")).expect("URL should build.").as_str()
	);

	let location: http::Uri = location.parse().expect("Location should be a valid URI.");
	let echoed = AuthorizationCallback::from_uri(&location);

	assert_eq!(echoed.state.as_deref(), Some("xyz"));
	assert_eq!(echoed.code, None);
}
