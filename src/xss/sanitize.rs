// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::_prelude::*;

const PATTERNS: &[&str] = &[
	// Script blocks first so their content goes with them.
	r"(?is)<script[^>]*>.*?</script\s*>",
	r"(?i)</script\s*>",
	r"(?is)<script[^>]*>",
	r#"(?is)src\s*=\s*'[^']*'"#,
	r#"(?is)src\s*=\s*"[^"]*""#,
	r"(?is)eval\s*\(.*?\)",
	r"(?is)expression\s*\(.*?\)",
	r"(?i)javascript\s*:",
	r"(?i)vbscript\s*:",
	r"(?i)\bon[a-z]+\s*=",
];

static FILTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	PATTERNS
		.iter()
		.map(|pattern| Regex::new(pattern).expect("XSS filter patterns are valid regexes."))
		.collect()
});

/// Strips script injection vectors from `value`.
///
/// Removes NUL characters, `<script>` blocks and stray script tags, quoted `src` attributes,
/// `eval(..)` and `expression(..)` calls, `javascript:`/`vbscript:` schemes, and inline event
/// handler attributes. Matching is case-insensitive. The input is borrowed back untouched when
/// nothing matches.
pub fn sanitize(value: &str) -> Cow<'_, str> {
	let mut out = if value.contains('\0') {
		Cow::Owned(value.replace('\0', ""))
	} else {
		Cow::Borrowed(value)
	};

	// Run to a fixed point: removing one match can join its neighbours into another.
	loop {
		let mut changed = false;

		for filter in FILTERS.iter() {
			let replaced = match filter.replace_all(&out, "") {
				Cow::Owned(replaced) => Some(replaced),
				Cow::Borrowed(_) => None,
			};

			if let Some(replaced) = replaced {
				out = Cow::Owned(replaced);
				changed = true;
			}
		}

		if !changed {
			break;
		}
	}

	out
}
