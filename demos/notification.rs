//! Sends a templated notification through the in-process mail bus, with a worker task playing
//! the mail service.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use serde_json::{Map, json};
// self
use webutils::email::{
	EmailRequest, I18nCatalog, InMemoryTemplates, NotificationConfig, NotificationHelper, mail_bus,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = NotificationConfig::resolve(
		Some(r#"{"email":"noreply@demo.test","host":"https://demo.test"}"#),
		&Map::new(),
	)?;
	let (sender, mut inbox) = mail_bus("email", 16);
	let worker = tokio::spawn(async move {
		while let Some(envelope) = inbox.recv().await {
			match envelope.payload_json() {
				Ok(payload) => println!("Mail worker received {payload}."),
				Err(e) => println!("Mail worker could not encode payload: {e}."),
			}

			envelope.reply(json!({ "status": "ok" }));
		}
	});
	let templates = InMemoryTemplates::new()
		.with("welcome", "<p>Welcome {{ name }}! Sign in at {{{ host }}}.</p>");
	let catalog = I18nCatalog::default().with_messages("fr", [("mail.welcome", "Bienvenue")]);
	let helper = NotificationHelper::new(config, Arc::new(sender), Arc::new(templates))
		.with_translator(Arc::new(catalog));
	let host = helper.host(None);
	let reply = helper
		.send_email(
			None,
			EmailRequest::single("ada@example.com", "mail.welcome", "welcome")
				.template_params(json!({ "name": "Ada", "host": host }))
				.translate_subject(true),
		)
		.await?;

	println!("Mail service replied {reply}.");

	drop(helper);
	worker.await?;

	Ok(())
}
