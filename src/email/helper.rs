// self
use crate::{
	_prelude::*,
	email::{
		EmailPayload, EmailRequest, EmailSender, I18nCatalog, NotificationConfig, RequestHead,
		TemplateRenderer, Translator,
	},
	obs::{OpKind, OpSpan},
};

/// Builds notification payloads and hands them to the mail worker.
///
/// The helper is cheap to clone; every collaborator is shared behind an [`Arc`].
#[derive(Clone)]
pub struct NotificationHelper {
	config: NotificationConfig,
	sender: Arc<dyn EmailSender>,
	renderer: Arc<dyn TemplateRenderer>,
	translator: Arc<dyn Translator>,
}
impl NotificationHelper {
	/// Creates a helper translating subjects with an empty [`I18nCatalog`].
	pub fn new(
		config: NotificationConfig,
		sender: Arc<dyn EmailSender>,
		renderer: Arc<dyn TemplateRenderer>,
	) -> Self {
		Self { config, sender, renderer, translator: Arc::new(I18nCatalog::default()) }
	}

	/// Replaces the subject translator.
	pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
		self.translator = translator;

		self
	}

	/// Resolved configuration.
	pub fn config(&self) -> &NotificationConfig {
		&self.config
	}

	/// Default sender address.
	pub fn sender_email(&self) -> &str {
		&self.config.sender_email
	}

	/// Public host for links in notifications.
	///
	/// Without a request this is the configured host; otherwise it is `scheme://authority` of
	/// the request, falling back to the configured host when the request carries no authority.
	pub fn host(&self, request: Option<&RequestHead<'_>>) -> String {
		request
			.and_then(|request| {
				request.authority().map(|authority| format!("{}://{authority}", request.scheme()))
			})
			.unwrap_or_else(|| self.config.host.clone())
	}

	/// Renders and sends one notification, returning the mail worker's reply.
	///
	/// A body that cannot be rendered yields [`Error::MessageMissing`] and nothing is sent.
	pub async fn send_email(
		&self,
		request: Option<&RequestHead<'_>>,
		email: EmailRequest,
	) -> Result<JsonValue> {
		const KIND: OpKind = OpKind::Email;

		let span = OpSpan::start(KIND, "send_email");
		let result = match span.in_scope(|| self.prepare(request, email)) {
			Ok(payload) => span.instrument(self.sender.send(payload)).await,
			Err(e) => Err(e),
		};

		span.finish(&result);

		result
	}

	fn prepare(
		&self,
		request: Option<&RequestHead<'_>>,
		email: EmailRequest,
	) -> Result<EmailPayload> {
		let EmailRequest {
			to,
			from,
			cc,
			bcc,
			subject,
			template,
			template_params,
			translate_subject,
			headers,
		} = email;
		let subject = if translate_subject {
			self.translator.translate(
				&subject,
				&self.host(request),
				request.and_then(RequestHead::accept_language),
			)
		} else {
			subject
		};
		let body = match template_params {
			Some(params) => self
				.renderer
				.render(request, &template, &params)
				.map_err(|source| Error::MessageMissing { source: Some(source) })?,
			None => template,
		};

		Ok(EmailPayload {
			to,
			from: from.unwrap_or_else(|| self.config.sender_email.clone()),
			cc,
			bcc,
			subject,
			headers,
			body,
		})
	}
}
impl Debug for NotificationHelper {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("NotificationHelper").field("config", &self.config).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::email::InMemoryTemplates;

	struct Recorder(Mutex<Vec<EmailPayload>>);
	impl EmailSender for Recorder {
		fn send(&self, payload: EmailPayload) -> crate::email::SendFuture<'_> {
			self.0.lock().push(payload);

			Box::pin(async { Ok(json!({ "status": "ok" })) })
		}
	}

	fn helper(recorder: Arc<Recorder>) -> NotificationHelper {
		let templates = InMemoryTemplates::new().with("welcome", "<p>Hello {{ name }}</p>");
		let catalog = I18nCatalog::new("fr")
			.with_messages("fr", [("mail.welcome", "Bienvenue")])
			.with_messages("en", [("mail.welcome", "Welcome")]);

		NotificationHelper::new(NotificationConfig::default(), recorder, Arc::new(templates))
			.with_translator(Arc::new(catalog))
	}

	#[test]
	fn host_uses_request_authority_or_configured_host() {
		let helper = helper(Arc::new(Recorder(Mutex::new(Vec::new()))));
		let request = Request::builder()
			.uri("/notify")
			.header(header::HOST, "portal.example.com:8443")
			.header("X-Forwarded-Proto", "https")
			.body(())
			.expect("Failed to build request fixture.");

		assert_eq!(helper.host(None), "http://localhost:8009");
		assert_eq!(
			helper.host(Some(&RequestHead::from(&request))),
			"https://portal.example.com:8443"
		);
		assert_eq!(helper.sender_email(), "noreply@one1d.fr");
	}

	#[tokio::test]
	async fn renders_template_and_translates_subject() {
		let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
		let helper = helper(recorder.clone());
		let request = Request::builder()
			.uri("/notify")
			.header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
			.body(())
			.expect("Failed to build request fixture.");
		let reply = helper
			.send_email(
				Some(&RequestHead::from(&request)),
				EmailRequest::single("a@example.com", "mail.welcome", "welcome")
					.template_params(json!({ "name": "Ada" }))
					.translate_subject(true),
			)
			.await
			.expect("Notification should be sent.");

		assert_eq!(reply, json!({ "status": "ok" }));

		let sent = recorder.0.lock();

		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].subject, "Welcome");
		assert_eq!(sent[0].body, "<p>Hello Ada</p>");
		assert_eq!(sent[0].from, "noreply@one1d.fr");
	}

	#[tokio::test]
	async fn literal_body_and_sender_override_are_kept() {
		let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
		let helper = helper(recorder.clone());

		helper
			.send_email(
				None,
				EmailRequest::single("a@example.com", "mail.welcome", "plain {{ text }}")
					.from("team@example.com"),
			)
			.await
			.expect("Notification should be sent.");

		let sent = recorder.0.lock();

		assert_eq!(sent[0].subject, "mail.welcome");
		assert_eq!(sent[0].body, "plain {{ text }}");
		assert_eq!(sent[0].from, "team@example.com");
	}

	#[tokio::test]
	async fn missing_template_reports_null_message() {
		let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
		let helper = helper(recorder.clone());
		let err = helper
			.send_email(
				None,
				EmailRequest::single("a@example.com", "Hi", "unknown").template_params(json!({})),
			)
			.await
			.expect_err("Unknown templates must not be sent.");

		assert_eq!(err.to_json(), json!({ "error": "Message is null." }));
		assert!(recorder.0.lock().is_empty());
	}
}
