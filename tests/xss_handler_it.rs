// crates.io
use serde::Deserialize;
// self
use webutils::{
	oauth::oauth2::http::{Method, Request, Response, StatusCode, header},
	xss::{XssHandler, XssRequest, xss_fn},
};

#[derive(Debug, Deserialize)]
struct Profile {
	display_name: String,
	links: Vec<String>,
}

/// Handler that echoes the sanitized profile back as plain text.
struct ProfileUpdate;
impl XssHandler<Vec<u8>> for ProfileUpdate {
	type Output = Response<String>;

	fn filter(&self, request: XssRequest<Vec<u8>>) -> Self::Output {
		if request.method() != Method::PUT {
			return Response::builder()
				.status(StatusCode::METHOD_NOT_ALLOWED)
				.body(String::new())
				.expect("Static response should build.");
		}

		match request.json_body::<Profile>() {
			Ok(profile) =>
				Response::new(format!("{}|{}", profile.display_name, profile.links.join(","))),
			Err(err) => Response::builder()
				.status(StatusCode::BAD_REQUEST)
				.body(err.to_json().to_string())
				.expect("Error response should build."),
		}
	}
}

fn put(body: &str) -> Request<Vec<u8>> {
	Request::builder()
		.method(Method::PUT)
		.uri("/profile")
		.header(header::CONTENT_TYPE, "application/json")
		.body(body.as_bytes().to_vec())
		.expect("Failed to build request fixture.")
}

#[test]
fn handler_receives_sanitized_json() {
	let response = ProfileUpdate.handle(put(
		r#"{"display_name":"<script>alert(1)</script>Ada","links":["https://ada.dev","JaVaScRiPt:steal()"]}"#,
	));

	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.body(), "Ada|https://ada.dev,steal()");
}

#[test]
fn handler_reports_malformed_json() {
	let response = ProfileUpdate.handle(put("{\"display_name\":"));

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(response.body(), r#"{"error":"Request body is not valid JSON."}"#);
}

#[test]
fn closure_handlers_read_form_attributes() {
	let handler = xss_fn(|request: XssRequest<Vec<u8>>| request.form_attributes());
	let request = Request::builder()
		.method(Method::POST)
		.uri("/comments")
		.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
		.body(b"comment=nice%3Cimg+src%3D%22x%22+onerror%3Dalert(1)%3E".to_vec())
		.expect("Failed to build request fixture.");

	assert_eq!(
		handler.handle(request),
		vec![("comment".to_owned(), "nice<img  alert(1)>".to_owned())]
	);
}
