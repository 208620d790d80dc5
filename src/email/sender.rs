//! Hand-off of rendered payloads to the mail worker.

// crates.io
use tokio::sync::{mpsc, oneshot};
// self
use crate::{_prelude::*, email::EmailPayload, error::DispatchError};

/// Future returned by [`EmailSender::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<JsonValue>> + 'a + Send>>;

/// Delivers a finished payload and resolves with the worker's reply.
pub trait EmailSender
where
	Self: 'static + Send + Sync,
{
	/// Sends `payload`; the future resolves once the worker has answered.
	fn send(&self, payload: EmailPayload) -> SendFuture<'_>;
}

/// Message published on the mail bus.
#[derive(Debug)]
pub struct MailEnvelope {
	/// Payload to deliver.
	pub payload: EmailPayload,
	reply: oneshot::Sender<JsonValue>,
}
impl MailEnvelope {
	/// Payload as the JSON document mail workers consume.
	pub fn payload_json(&self) -> Result<JsonValue, DispatchError> {
		Ok(serde_json::to_value(&self.payload)?)
	}

	/// Answers the publisher; returns false when it stopped waiting.
	pub fn reply(self, message: JsonValue) -> bool {
		self.reply.send(message).is_ok()
	}
}

/// [`EmailSender`] publishing on a bounded in-process channel.
#[derive(Clone, Debug)]
pub struct BusEmailSender {
	address: Arc<str>,
	tx: mpsc::Sender<MailEnvelope>,
}
impl BusEmailSender {
	/// Address the sender publishes to.
	pub fn address(&self) -> &str {
		&self.address
	}
}
impl EmailSender for BusEmailSender {
	fn send(&self, payload: EmailPayload) -> SendFuture<'_> {
		Box::pin(async move {
			let (reply, answer) = oneshot::channel();

			self.tx
				.send(MailEnvelope { payload, reply })
				.await
				.map_err(|_| DispatchError::BusClosed { address: self.address.to_string() })?;

			let message = answer
				.await
				.map_err(|_| DispatchError::NoReply { address: self.address.to_string() })?;

			Ok(message)
		})
	}
}

/// Receiving side of the mail bus, owned by the mail worker.
#[derive(Debug)]
pub struct MailInbox {
	address: Arc<str>,
	rx: mpsc::Receiver<MailEnvelope>,
}
impl MailInbox {
	/// Address the inbox listens on.
	pub fn address(&self) -> &str {
		&self.address
	}

	/// Waits for the next envelope; `None` once every sender is dropped.
	pub async fn recv(&mut self) -> Option<MailEnvelope> {
		self.rx.recv().await
	}

	/// Stops accepting envelopes; senders fail with [`DispatchError::BusClosed`].
	pub fn close(&mut self) {
		self.rx.close();
	}
}

/// Creates a mail bus with room for `capacity` pending envelopes (at least one).
pub fn mail_bus(address: impl Into<String>, capacity: usize) -> (BusEmailSender, MailInbox) {
	let address: Arc<str> = address.into().into();
	let (tx, rx) = mpsc::channel(capacity.max(1));

	(BusEmailSender { address: address.clone(), tx }, MailInbox { address, rx })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn payload() -> EmailPayload {
		EmailPayload {
			to: vec!["a@example.com".into()],
			from: "noreply@example.com".into(),
			cc: None,
			bcc: None,
			subject: "Hello".into(),
			headers: None,
			body: "Hi".into(),
		}
	}

	#[tokio::test]
	async fn consumer_reply_is_returned() {
		let (sender, mut inbox) = mail_bus("email", 4);
		let worker = tokio::spawn(async move {
			let envelope = inbox.recv().await.expect("Envelope should arrive.");
			let json = envelope.payload_json().expect("Payload should serialize.");

			assert_eq!(json["to"], json!(["a@example.com"]));
			assert!(envelope.reply(json!({ "status": "ok" })));
		});
		let reply = sender.send(payload()).await.expect("Send should succeed.");

		worker.await.expect("Worker should finish.");

		assert_eq!(reply, json!({ "status": "ok" }));
		assert_eq!(sender.address(), "email");
	}

	#[tokio::test]
	async fn closed_bus_and_dropped_reply_are_errors() {
		let (sender, inbox) = mail_bus("email", 1);

		drop(inbox);

		let err = sender.send(payload()).await.expect_err("Closed bus must fail.");

		assert!(matches!(err, Error::Dispatch(DispatchError::BusClosed { .. })));

		let (sender, mut inbox) = mail_bus("email", 1);
		let worker = tokio::spawn(async move {
			drop(inbox.recv().await);
		});
		let err = sender.send(payload()).await.expect_err("Dropped reply must fail.");

		worker.await.expect("Worker should finish.");

		assert!(matches!(err, Error::Dispatch(DispatchError::NoReply { .. })));
	}
}
