//! Subject translation with `Accept-Language` negotiation.

// self
use crate::{_prelude::*, error::ConfigError};

/// Translates i18n keys for a host and a preferred language list.
pub trait Translator
where
	Self: 'static + Send + Sync,
{
	/// Returns the text for `key`, or `key` itself when no translation exists.
	///
	/// `host` is the public host of the request (`scheme://authority`) and `accept_language`
	/// the raw `Accept-Language` header, when known.
	fn translate(&self, key: &str, host: &str, accept_language: Option<&str>) -> String;
}

/// Fallback language of [`I18nCatalog::default`].
pub const DEFAULT_LANGUAGE: &str = "fr";

type Messages = HashMap<String, String>;

/// In-memory catalog of per-language messages with optional per-host overrides.
#[derive(Clone, Debug)]
pub struct I18nCatalog {
	default_language: String,
	languages: HashMap<String, Messages>,
	hosts: HashMap<String, HashMap<String, Messages>>,
}
impl I18nCatalog {
	/// Creates an empty catalog whose fallback language is `default_language`.
	pub fn new(default_language: impl Into<String>) -> Self {
		Self {
			default_language: normalize(&default_language.into()),
			languages: HashMap::new(),
			hosts: HashMap::new(),
		}
	}

	/// Fallback language.
	pub fn default_language(&self) -> &str {
		&self.default_language
	}

	/// Adds messages for `language`, merged over any existing entries.
	pub fn with_messages<I, K, V>(mut self, language: &str, messages: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.languages
			.entry(normalize(language))
			.or_default()
			.extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Adds messages for `language` from a flat JSON object of key to text.
	pub fn with_json(self, language: &str, json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let messages: Messages = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ConfigError::Malformed { source })?;

		Ok(self.with_messages(language, messages))
	}

	/// Adds messages that only apply to requests served under `host`.
	pub fn with_host_messages<I, K, V>(mut self, host: &str, language: &str, messages: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.hosts
			.entry(host.to_owned())
			.or_default()
			.entry(normalize(language))
			.or_default()
			.extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Picks the best available language for an `Accept-Language` header.
	///
	/// Ranges are tried by descending quality; a regional range (`fr-CA`) also matches its
	/// primary language (`fr`), and `*` matches the default language.
	pub fn negotiate(&self, accept_language: Option<&str>) -> String {
		let Some(header) = accept_language else {
			return self.default_language.clone();
		};
		let mut ranges = header
			.split(',')
			.filter_map(|entry| {
				let mut parts = entry.split(';');
				let tag = normalize(parts.next()?);
				let quality = parts
					.filter_map(|param| param.trim().strip_prefix("q="))
					.find_map(|q| q.trim().parse::<f32>().ok())
					.unwrap_or(1.);

				(!tag.is_empty() && quality > 0.).then_some((tag, quality))
			})
			.collect::<Vec<_>>();

		ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

		for (tag, _) in ranges {
			if tag == "*" {
				return self.default_language.clone();
			}
			if self.languages.contains_key(&tag) {
				return tag;
			}
			if let Some((primary, _)) = tag.split_once('-')
				&& self.languages.contains_key(primary)
			{
				return primary.to_owned();
			}
		}

		self.default_language.clone()
	}
}
impl Default for I18nCatalog {
	fn default() -> Self {
		Self::new(DEFAULT_LANGUAGE)
	}
}
impl Translator for I18nCatalog {
	fn translate(&self, key: &str, host: &str, accept_language: Option<&str>) -> String {
		let language = self.negotiate(accept_language);
		let host_messages = self.hosts.get(host);

		[&language, &self.default_language]
			.into_iter()
			.find_map(|lang| {
				host_messages
					.and_then(|languages| languages.get(lang.as_str()))
					.and_then(|messages| messages.get(key))
					.or_else(|| {
						self.languages.get(lang.as_str()).and_then(|messages| messages.get(key))
					})
			})
			.cloned()
			.unwrap_or_else(|| key.to_owned())
	}
}

fn normalize(tag: &str) -> String {
	tag.trim().to_ascii_lowercase().replace('_', "-")
}
