use serde::Deserialize;

use crate::Matcher;
use crate::Parser;
use crate::ParserConfig;
use crate::ThothResult;

/// A set of glob patterns and the parser used for any template whose
/// relative path matches one of them.
///
/// ```yaml
/// patterns: ["**/*.json.tmpl"]
/// parser:
///   missingKey: zero
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectorConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
	#[serde(default)]
	pub parser: ParserConfig,
}

impl SelectorConfig {
	pub fn new<I, S>(patterns: I, parser: ParserConfig) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			patterns: patterns.into_iter().map(Into::into).collect(),
			parser,
		}
	}
}

#[derive(Debug, Clone)]
struct SelectorEntry {
	matcher: Matcher,
	parser: Parser,
}

/// Picks the parser for a template name.
///
/// Entries are checked in declaration order and the first whose patterns
/// match wins. There is no ranking by specificity.
#[derive(Debug, Clone, Default)]
pub struct Selector {
	entries: Vec<SelectorEntry>,
}

impl Selector {
	/// Build one matcher and one parser per config, in order. Any failure
	/// aborts the whole selector.
	pub fn new(configs: &[SelectorConfig]) -> ThothResult<Self> {
		let entries = configs
			.iter()
			.map(|config| -> ThothResult<SelectorEntry> {
				Ok(SelectorEntry {
					matcher: Matcher::new(&config.patterns)?,
					parser: Parser::new(&config.parser)?,
				})
			})
			.collect::<ThothResult<Vec<_>>>()?;

		Ok(Self { entries })
	}

	/// The parser for `name`, or `None` when no entry matches.
	pub fn select(&self, name: &str) -> Option<&Parser> {
		self.entries
			.iter()
			.find(|entry| entry.matcher.is_match(name))
			.map(|entry| &entry.parser)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
