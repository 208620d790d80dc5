// self
use crate::{
	_prelude::*,
	obs::{OpKind, OpSpan},
	xss::XssRequest,
};

/// Request handler that only ever sees sanitized requests.
///
/// Implementors provide [`XssHandler::filter`]; callers invoke [`XssHandler::handle`] with the
/// raw request. `Output` is whatever the surrounding server expects, a future included.
pub trait XssHandler<B> {
	/// Value produced for each request.
	type Output;

	/// Handles the wrapped request.
	fn filter(&self, request: XssRequest<B>) -> Self::Output;

	/// Wraps `request` in an [`XssRequest`] and delegates to [`XssHandler::filter`].
	fn handle(&self, request: Request<B>) -> Self::Output {
		let span = OpSpan::start(OpKind::XssFilter, "handle");

		span.in_scope(|| self.filter(XssRequest::new(request)))
	}
}

/// [`XssHandler`] backed by a closure; see [`xss_fn`].
#[derive(Clone, Copy)]
pub struct XssFn<F>(F);
impl<F> Debug for XssFn<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("XssFn(..)")
	}
}
impl<B, F, O> XssHandler<B> for XssFn<F>
where
	F: Fn(XssRequest<B>) -> O,
{
	type Output = O;

	fn filter(&self, request: XssRequest<B>) -> O {
		(self.0)(request)
	}
}

/// Turns `f` into an [`XssHandler`].
pub fn xss_fn<B, F, O>(f: F) -> XssFn<F>
where
	F: Fn(XssRequest<B>) -> O,
{
	XssFn(f)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	struct Echo;
	impl XssHandler<String> for Echo {
		type Output = (Option<String>, String);

		fn filter(&self, request: XssRequest<String>) -> Self::Output {
			(request.param("name"), request.body_text())
		}
	}

	fn request(body: &str) -> Request<String> {
		Request::builder()
			.uri("/greet?name=Bob%3Cscript%3Ex()%3C%2Fscript%3E")
			.body(body.to_owned())
			.expect("Failed to build request fixture.")
	}

	#[test]
	fn handle_wraps_before_filtering() {
		let (name, body) = Echo.handle(request("hi <img src=\"x\">"));

		assert_eq!(name.as_deref(), Some("Bob"));
		assert_eq!(body, "hi <img >");
	}

	#[test]
	fn closures_act_as_handlers() {
		let handler =
			xss_fn(|request: XssRequest<String>| request.param("name").unwrap_or_default());

		assert_eq!(handler.handle(request("")), "Bob");
	}
}
