//! Mail body templates with `{{ key }}` placeholders.
//!
//! `{{ key }}` inserts the HTML-escaped value found at `key` in the JSON parameters; dotted keys
//! (`{{ user.name }}`) walk nested objects and arrays. `{{{ key }}}` inserts the value verbatim.
//! Missing keys and `null` render as the empty string.

// std
use std::{
	fs, io,
	path::{Component, Path, PathBuf},
};
// self
use crate::{_prelude::*, email::RequestHead};

/// Failures raised while producing a mail body.
#[derive(Debug, ThisError)]
pub enum RenderError {
	/// No template with this name exists.
	#[error("Template `{name}` was not found.")]
	NotFound {
		/// Requested template name.
		name: String,
	},
	/// The template exists but could not be read.
	#[error("Template `{name}` could not be read.")]
	Io {
		/// Requested template name.
		name: String,
		/// Underlying IO failure.
		#[source]
		source: io::Error,
	},
	/// The template name is empty or escapes the template root.
	#[error("Template name `{name}` is not allowed.")]
	InvalidName {
		/// Rejected template name.
		name: String,
	},
	/// A placeholder is opened but never closed.
	#[error("Template `{name}` has an unclosed placeholder at byte {offset}.")]
	UnclosedTag {
		/// Template name.
		name: String,
		/// Byte offset of the opening braces.
		offset: usize,
	},
}

/// Produces mail bodies from named templates.
pub trait TemplateRenderer
where
	Self: 'static + Send + Sync,
{
	/// Renders `template` with `params`.
	///
	/// `request` is the inbound request that triggered the notification, when there is one.
	fn render(
		&self,
		request: Option<&RequestHead<'_>>,
		template: &str,
		params: &JsonValue,
	) -> Result<String, RenderError>;
}

/// Templates read from files under a root directory and cached after the first read.
#[derive(Debug)]
pub struct TemplateDirectory {
	root: PathBuf,
	cache: Option<RwLock<HashMap<String, Arc<str>>>>,
}
impl TemplateDirectory {
	/// Serves templates from `root`, caching their sources.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into(), cache: Some(Default::default()) }
	}

	/// Re-reads every template on each render.
	pub fn without_cache(mut self) -> Self {
		self.cache = None;

		self
	}

	/// Root directory templates are resolved against.
	pub fn root(&self) -> &Path {
		&self.root
	}

	fn load(&self, name: &str) -> Result<Arc<str>, RenderError> {
		if let Some(source) = self.cache.as_ref().and_then(|cache| cache.read().get(name).cloned())
		{
			return Ok(source);
		}

		let path = self.resolve(name)?;
		let source: Arc<str> = fs::read_to_string(&path)
			.map_err(|source| match source.kind() {
				io::ErrorKind::NotFound => RenderError::NotFound { name: name.into() },
				_ => RenderError::Io { name: name.into(), source },
			})?
			.into();

		if let Some(cache) = &self.cache {
			cache.write().insert(name.to_owned(), source.clone());
		}

		Ok(source)
	}

	fn resolve(&self, name: &str) -> Result<PathBuf, RenderError> {
		let relative = Path::new(name);
		let contained = !name.is_empty()
			&& relative.components().all(|component| matches!(component, Component::Normal(_)));

		if !contained {
			return Err(RenderError::InvalidName { name: name.into() });
		}

		Ok(self.root.join(relative))
	}
}
impl TemplateRenderer for TemplateDirectory {
	fn render(
		&self,
		_request: Option<&RequestHead<'_>>,
		template: &str,
		params: &JsonValue,
	) -> Result<String, RenderError> {
		let source = self.load(template)?;

		render_placeholders(template, &source, params)
	}
}

/// Templates registered in memory, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTemplates(HashMap<String, String>);
impl InMemoryTemplates {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a template, replacing any previous one with the same name.
	pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
		self.insert(name, source);

		self
	}

	/// Registers a template in place.
	pub fn insert(&mut self, name: impl Into<String>, source: impl Into<String>) {
		self.0.insert(name.into(), source.into());
	}
}
impl TemplateRenderer for InMemoryTemplates {
	fn render(
		&self,
		_request: Option<&RequestHead<'_>>,
		template: &str,
		params: &JsonValue,
	) -> Result<String, RenderError> {
		let source =
			self.0.get(template).ok_or_else(|| RenderError::NotFound { name: template.into() })?;

		render_placeholders(template, source, params)
	}
}

/// Substitutes every placeholder in `source` with the matching value from `params`.
pub fn render_placeholders(
	name: &str,
	source: &str,
	params: &JsonValue,
) -> Result<String, RenderError> {
	let mut out = String::with_capacity(source.len());
	let mut rest = source;

	while let Some(start) = rest.find("{{") {
		let offset = source.len() - rest.len() + start;
		let (raw, open, close) =
			if rest[start..].starts_with("{{{") { (true, 3, "}}}") } else { (false, 2, "}}") };
		let tail = &rest[start + open..];
		let end = tail
			.find(close)
			.ok_or_else(|| RenderError::UnclosedTag { name: name.into(), offset })?;

		out.push_str(&rest[..start]);

		let value = lookup(params, tail[..end].trim()).map(stringify).unwrap_or_default();

		if raw {
			out.push_str(&value);
		} else {
			escape_html_into(&value, &mut out);
		}

		rest = &tail[end + close.len()..];
	}

	out.push_str(rest);

	Ok(out)
}

fn lookup<'a>(params: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
	if key.is_empty() {
		return None;
	}

	key.split('.').try_fold(params, |value, segment| match value {
		JsonValue::Object(map) => map.get(segment),
		JsonValue::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
		_ => None,
	})
}

fn stringify(value: &JsonValue) -> String {
	match value {
		JsonValue::Null => String::new(),
		JsonValue::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn escape_html_into(value: &str, out: &mut String) {
	for c in value.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn placeholders_escape_unless_triple_braced() {
		let params = json!({
			"user": { "name": "Ada <admin>", "roles": ["owner", "editor"] },
			"link": "<a href=\"/x\">x</a>",
			"count": 3,
			"none": null
		});
		let rendered = render_placeholders(
			"welcome",
			"Hi {{ user.name }} ({{user.roles.1}}, {{count}}){{none}}{{missing}}: {{{ link }}}",
			&params,
		)
		.expect("Template should render.");

		assert_eq!(rendered, "Hi Ada &lt;admin&gt; (editor, 3): <a href=\"/x\">x</a>");
	}

	#[test]
	fn unclosed_placeholder_reports_offset() {
		let err = render_placeholders("broken", "ok {{ name", &json!({}))
			.expect_err("Unclosed placeholders must fail.");

		assert!(matches!(err, RenderError::UnclosedTag { offset: 3, .. }));
	}

	#[test]
	fn in_memory_templates_report_unknown_names() {
		let templates = InMemoryTemplates::new().with("hello", "Hello {{name}}");

		assert_eq!(
			templates.render(None, "hello", &json!({ "name": "Bob" })).expect("Known template."),
			"Hello Bob"
		);
		assert!(matches!(
			templates.render(None, "bye", &json!({})),
			Err(RenderError::NotFound { .. })
		));
	}

	#[test]
	fn directory_templates_are_cached_and_contained() {
		let dir = tempfile::tempdir().expect("Failed to create template directory.");

		fs::write(dir.path().join("reset.html"), "Reset: {{ url }}")
			.expect("Failed to write template fixture.");

		let templates = TemplateDirectory::new(dir.path());
		let params = json!({ "url": "https://x.test/r?a=1&b=2" });

		assert_eq!(
			templates.render(None, "reset.html", &params).expect("Template should render."),
			"Reset: https://x.test/r?a=1&amp;b=2"
		);

		fs::write(dir.path().join("reset.html"), "changed").expect("Failed to rewrite fixture.");

		assert_eq!(
			templates.render(None, "reset.html", &params).expect("Cached template should render."),
			"Reset: https://x.test/r?a=1&amp;b=2"
		);
		assert!(matches!(
			templates.render(None, "../etc/passwd", &params),
			Err(RenderError::InvalidName { .. })
		));
		assert!(matches!(
			templates.render(None, "absent.html", &params),
			Err(RenderError::NotFound { .. })
		));
	}
}
