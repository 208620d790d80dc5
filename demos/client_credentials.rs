//! Requests an app-only token with the client-credentials grant, then calls a protected
//! resource with it. A local mock server stands in for the provider.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use webutils::{
	http::ReqwestHttpClient,
	oauth::{OAuth2Client, OAuth2ClientConfig, ReqwestOAuth2Client, ReqwestTransportErrorMapper},
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
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/status").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", "application/json").body("{\"up\":true}");
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
	let grant = client.client_credentials_token(Some("status.read")).await?;
	let access_token = grant.access_token().unwrap_or_default();

	println!("Token expires in {:?}.", grant.expires_in());

	let response = client.get_protected_resource("/api/status", access_token).await?;

	println!("Status endpoint answered {}: {}.", response.status(), response.text());

	token_mock.assert_async().await;
	resource_mock.assert_async().await;

	client.close();

	Ok(())
}
