use globset::GlobBuilder;
use globset::GlobSet;
use globset::GlobSetBuilder;

use crate::ThothError;
use crate::ThothResult;

/// A predicate over path strings compiled from a set of glob patterns.
///
/// A path matches when at least one pattern matches it. The path separator
/// is literal, so `*` never crosses a `/` while `**` does. A matcher built
/// from no patterns matches nothing, not even the empty string.
///
/// ```rust
/// use thoth_core::Matcher;
///
/// let matcher = Matcher::new(["*.tmpl", "config/**/*.json"]).unwrap();
/// assert!(matcher.is_match("index.tmpl"));
/// assert!(matcher.is_match("config/a/b/c.json"));
/// assert!(!matcher.is_match("nested/index.tmpl"));
/// ```
#[derive(Debug, Clone)]
pub struct Matcher {
	patterns: Vec<String>,
	set: GlobSet,
}

impl Matcher {
	/// Compile every pattern eagerly. The first malformed pattern fails the
	/// whole matcher.
	pub fn new<I, S>(patterns: I) -> ThothResult<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut builder = GlobSetBuilder::new();
		let mut sources = Vec::new();

		for pattern in patterns {
			let pattern = pattern.as_ref();
			let glob = GlobBuilder::new(pattern)
				.literal_separator(true)
				.build()
				.map_err(|e| {
					ThothError::InvalidPattern {
						pattern: pattern.to_string(),
						reason: e.kind().to_string(),
					}
				})?;
			builder.add(glob);
			sources.push(pattern.to_string());
		}

		let set = builder.build().map_err(|e| {
			ThothError::InvalidPattern {
				pattern: sources.join(", "),
				reason: e.to_string(),
			}
		})?;

		Ok(Self {
			patterns: sources,
			set,
		})
	}

	/// A matcher that never matches.
	pub fn empty() -> Self {
		Self {
			patterns: Vec::new(),
			set: GlobSet::empty(),
		}
	}

	pub fn is_match(&self, path: &str) -> bool {
		!self.set.is_empty() && self.set.is_match(path)
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	/// The source patterns in declaration order.
	pub fn patterns(&self) -> &[String] {
		&self.patterns
	}
}

impl Default for Matcher {
	fn default() -> Self {
		Self::empty()
	}
}
