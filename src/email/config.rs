//! Sender identity and public host used by notifications.

// self
use crate::{_prelude::*, error::ConfigError};

/// Sender address used when no layer overrides it.
pub const DEFAULT_SENDER_EMAIL: &str = "noreply@one1d.fr";
/// Public host used when no layer overrides it.
pub const DEFAULT_HOST: &str = "http://localhost:8009";

/// Notification settings resolved from layered JSON configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
	/// Address placed in the `from` field unless a request overrides it.
	#[serde(rename = "email")]
	pub sender_email: String,
	/// Public base URL (`scheme://host[:port]`) used when no inbound request is available.
	pub host: String,
}
impl NotificationConfig {
	/// Resolves the settings from the built-in defaults, then the server-wide shared email
	/// configuration (a JSON document with `email`/`host`), then the module configuration.
	///
	/// Keys missing from a layer, or holding non-string values, keep the previous layer's value.
	pub fn resolve(
		shared: Option<&str>,
		module: &JsonMap<String, JsonValue>,
	) -> Result<Self, ConfigError> {
		let mut config = Self::default();

		if let Some(shared) = shared {
			let shared = serde_json::from_str::<JsonMap<String, JsonValue>>(shared)
				.map_err(|source| ConfigError::InvalidSharedConfig { source })?;

			config.overlay(&shared);
		}

		config.overlay(module);

		Ok(config)
	}

	/// Overrides the sender address.
	pub fn with_sender_email(mut self, sender_email: impl Into<String>) -> Self {
		self.sender_email = sender_email.into();

		self
	}

	/// Overrides the public host.
	pub fn with_host(mut self, host: impl Into<String>) -> Self {
		self.host = host.into();

		self
	}

	fn overlay(&mut self, layer: &JsonMap<String, JsonValue>) {
		if let Some(email) = layer.get("email").and_then(JsonValue::as_str) {
			self.sender_email = email.to_owned();
		}
		if let Some(host) = layer.get("host").and_then(JsonValue::as_str) {
			self.host = host.to_owned();
		}
	}
}
impl Default for NotificationConfig {
	fn default() -> Self {
		Self { sender_email: DEFAULT_SENDER_EMAIL.into(), host: DEFAULT_HOST.into() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn object(value: JsonValue) -> JsonMap<String, JsonValue> {
		match value {
			JsonValue::Object(map) => map,
			_ => panic!("Fixture must be a JSON object."),
		}
	}

	#[test]
	fn defaults_apply_without_layers() {
		let config =
			NotificationConfig::resolve(None, &JsonMap::new()).expect("Defaults should resolve.");

		assert_eq!(config, NotificationConfig::default());
		assert_eq!(config.sender_email, "noreply@one1d.fr");
		assert_eq!(config.host, "http://localhost:8009");
	}

	#[test]
	fn module_layer_wins_over_shared_layer() {
		let shared = r#"{"email":"shared@example.com","host":"https://shared.example.com"}"#;
		let module = object(json!({ "host": "https://module.example.com", "email": 42 }));
		let config =
			NotificationConfig::resolve(Some(shared), &module).expect("Layers should resolve.");

		assert_eq!(config.sender_email, "shared@example.com");
		assert_eq!(config.host, "https://module.example.com");
	}

	#[test]
	fn malformed_shared_layer_is_rejected() {
		let err = NotificationConfig::resolve(Some("not json"), &JsonMap::new())
			.expect_err("Malformed shared configuration must fail.");

		assert!(matches!(err, ConfigError::InvalidSharedConfig { .. }));
	}

	#[test]
	fn deserializes_with_partial_keys() {
		let config: NotificationConfig = serde_json::from_value(json!({ "email": "a@b.c" }))
			.expect("Partial configuration should deserialize.");

		assert_eq!(config.sender_email, "a@b.c");
		assert_eq!(config.host, DEFAULT_HOST);
	}
}
