// crates.io
use httpmock::prelude::*;
// self
use webutils::{
	_preludet::*,
	oauth::{OAuth2ClientConfig, ProtectedRequest},
};

fn build_client(server: &MockServer) -> ReqwestTestClient {
	let config = OAuth2ClientConfig::builder(
		Url::parse(&server.base_url()).expect("Mock server URL should parse."),
	)
	.client_id("portal")
	.client_secret("s3cret")
	.redirect_uri("https://app.example.com/callback")
	.build()
	.expect("Client configuration should build.");

	build_reqwest_test_client(config)
}

#[tokio::test]
async fn get_sends_bearer_and_default_accept() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/me")
				.header("authorization", "Bearer at-1")
				.header("accept", "application/json; charset=UTF-8");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"id\":\"u-1\",\"name\":\"Ada\"}");
		})
		.await;
	let response =
		client.get_protected_resource("/api/me", "at-1").await.expect("GET should succeed.");

	mock.assert_async().await;

	assert!(response.is_success());

	let body: JsonValue = response.json().expect("Profile should be JSON.");

	assert_eq!(body, json!({ "id": "u-1", "name": "Ada" }));
}

#[tokio::test]
async fn write_methods_forward_body_and_status() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let post = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/notes")
				.header("authorization", "Bearer at-1")
				.body("{\"text\":\"hello\"}");
			then.status(201).body("{\"id\":7}");
		})
		.await;
	let put = server
		.mock_async(|when, then| {
			when.method(PUT).path("/api/notes/7").body("{\"text\":\"bye\"}");
			then.status(204);
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/notes/7");
			then.status(404).body("missing");
		})
		.await;
	let created = client
		.post_protected_resource("/api/notes", "at-1", "{\"text\":\"hello\"}")
		.await
		.expect("POST should succeed.");
	let updated = client
		.put_protected_resource("/api/notes/7", "at-1", "{\"text\":\"bye\"}")
		.await
		.expect("PUT should succeed.");
	let deleted = client
		.delete_protected_resource("/api/notes/7", "at-1")
		.await
		.expect("Non-2xx statuses are returned, not raised.");

	post.assert_async().await;
	put.assert_async().await;
	delete.assert_async().await;

	assert_eq!(created.status().as_u16(), 201);
	assert_eq!(updated.status().as_u16(), 204);
	assert_eq!(deleted.status().as_u16(), 404);
	assert!(!deleted.is_success());
	assert_eq!(deleted.text(), "missing");
}

#[tokio::test]
async fn custom_accept_and_headers_are_applied() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/export")
				.query_param("format", "csv")
				.header("accept", "text/csv")
				.header("x-request-id", "42");
			then.status(429).header("retry-after", "30").body("slow down");
		})
		.await;
	let request = ProtectedRequest::get("/api/export?format=csv")
		.headers([("Accept", "text/csv"), ("X-Request-Id", "42")]);
	let response = client
		.send_protected_resource(request, "at-1")
		.await
		.expect("Throttled responses are still responses.");

	mock.assert_async().await;

	assert_eq!(response.status().as_u16(), 429);
	assert_eq!(response.retry_after().map(|d| d.whole_seconds()), Some(30));
}
