//! Walks the authorization-code flow: redirect, callback parsing, and the code exchange. The
//! provider is a local mock server; the user agent hop is simulated.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use webutils::{
	http::ReqwestHttpClient,
	oauth::{
		AuthorizationCallback, OAuth2Client, OAuth2ClientConfig, ReqwestOAuth2Client,
		ReqwestTransportErrorMapper, generate_state, token_json,
	},
	reqwest,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"user-access\",\"refresh_token\":\"user-refresh\",\"token_type\":\"bearer\"}",
			);
		})
		.await;
	let config = OAuth2ClientConfig::builder(Url::parse(&server.base_url())?)
		.client_id("demo-client")
		.client_secret("super-secret")
		.redirect_uri("https://app.example.com/callback")
		.build()?;
	// The mock provider serves a self-signed certificate.
	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder().danger_accept_invalid_certs(true).build()?,
	);
	let client: ReqwestOAuth2Client =
		OAuth2Client::with_http_client(config, http_client, ReqwestTransportErrorMapper);
	let state = generate_state();
	let redirect = client.authorize_redirect(&state, Some("profile email"))?;

	println!(
		"Redirecting user agent ({}) to {:?}.",
		redirect.status(),
		redirect.headers().get("location")
	);

	// The provider would now redirect back to the callback with the code and our state.
	let callback = AuthorizationCallback::from_query(&format!("code=demo-code&state={state}"));
	let result = client.authorization_code_token(&callback, Some(&state)).await;

	println!("Callback payload: {}.", token_json(&result));

	token_mock.assert_async().await;

	Ok(())
}
