use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use derive_more::Deref;
use derive_more::DerefMut;
use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::UndefinedBehavior;
use minijinja::Value;
use minijinja::syntax::SyntaxConfig;
use minijinja::value::Rest;
use serde::Deserialize;

use crate::Template;
use crate::ThothError;
use crate::ThothResult;

/// The default left delimiter for expressions.
pub const DEFAULT_LEFT_DELIM: &str = "{{";
/// The default right delimiter for expressions.
pub const DEFAULT_RIGHT_DELIM: &str = "}}";

/// Which escaping mode the engine runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Engine {
	/// Plain text output. Nothing is escaped.
	#[default]
	Text,
	/// Markup output. Every interpolated value is HTML escaped.
	Html,
}

impl Engine {
	fn auto_escape(self) -> AutoEscape {
		match self {
			Self::Text => AutoEscape::None,
			Self::Html => AutoEscape::Html,
		}
	}
}

/// Behavior when a template references a key the model doesn't have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKey {
	/// The missing value propagates as an invalid value through attribute
	/// lookups and renders as nothing.
	Invalid,
	/// The missing value renders as the engine's default, an empty string.
	Default,
	/// The missing value renders as the zero value, an empty string.
	Zero,
	/// Any use of a missing value fails rendering.
	#[default]
	Error,
}

impl MissingKey {
	/// Resolve an optional configured value. Unset and empty values resolve to
	/// [`MissingKey::Error`].
	pub fn resolve(value: Option<&str>) -> ThothResult<Self> {
		match value {
			None | Some("") => Ok(Self::default()),
			Some(value) => value.parse(),
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Invalid => "invalid",
			Self::Default => "default",
			Self::Zero => "zero",
			Self::Error => "error",
		}
	}

	fn undefined_behavior(self) -> UndefinedBehavior {
		match self {
			Self::Invalid => UndefinedBehavior::Chainable,
			Self::Default | Self::Zero => UndefinedBehavior::Lenient,
			Self::Error => UndefinedBehavior::Strict,
		}
	}
}

impl FromStr for MissingKey {
	type Err = ThothError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"invalid" => Ok(Self::Invalid),
			"default" => Ok(Self::Default),
			"zero" => Ok(Self::Zero),
			"error" => Ok(Self::Error),
			other => Err(ThothError::InvalidMissingKey(other.to_string())),
		}
	}
}

impl fmt::Display for MissingKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A function callable from templates.
pub type TemplateFunction =
	Arc<dyn Fn(&[Value]) -> Result<Value, minijinja::Error> + Send + Sync + 'static>;

/// Named functions handed to the engine as-is.
#[derive(Clone, Default, Deref, DerefMut)]
pub struct FunctionMap(BTreeMap<String, TemplateFunction>);

impl FunctionMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Bind `function` under `name`, replacing any earlier binding.
	pub fn bind<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
	where
		F: Fn(&[Value]) -> Result<Value, minijinja::Error> + Send + Sync + 'static,
	{
		self.0.insert(name.into(), Arc::new(function));
		self
	}
}

impl fmt::Debug for FunctionMap {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.0.keys()).finish()
	}
}

/// Options for building a [`Parser`].
///
/// ```yaml
/// engine: html
/// missingKey: zero
/// leftDelim: "[["
/// rightDelim: "]]"
/// mediaType: text/html
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
	/// The escaping mode. Defaults to plain text.
	#[serde(default)]
	pub engine: Engine,
	/// One of `invalid`, `default`, `zero` or `error`. Unset means `error`.
	#[serde(default)]
	pub missing_key: Option<String>,
	/// Left expression delimiter. Unset means `{{`.
	#[serde(default)]
	pub left_delim: Option<String>,
	/// Right expression delimiter. Unset means `}}`.
	#[serde(default)]
	pub right_delim: Option<String>,
	/// Media type of rendered output. Unset means
	/// [`DEFAULT_MEDIA_TYPE`](crate::DEFAULT_MEDIA_TYPE).
	#[serde(default)]
	pub media_type: Option<String>,
	/// Functions available to every template from this parser.
	#[serde(skip)]
	pub functions: FunctionMap,
}

/// Compiles template content with one fixed engine configuration.
///
/// The configuration is validated and baked into a prototype environment
/// once. Every call to [`Parser::parse`] clones that prototype before adding
/// the new template, so nothing one file defines is visible to another.
#[derive(Debug, Clone)]
pub struct Parser {
	prototype: Environment<'static>,
	engine: Engine,
	missing_key: MissingKey,
	media_type: Option<String>,
}

impl Parser {
	pub fn new(config: &ParserConfig) -> ThothResult<Self> {
		let missing_key = MissingKey::resolve(config.missing_key.as_deref())?;
		let engine = config.engine;

		let mut prototype = Environment::new();
		prototype.set_keep_trailing_newline(true);
		prototype.set_undefined_behavior(missing_key.undefined_behavior());
		prototype.set_auto_escape_callback(move |_| engine.auto_escape());

		if let Some(syntax) = syntax_config(config)? {
			prototype.set_syntax(syntax);
		}

		for (name, function) in config.functions.iter() {
			let function = Arc::clone(function);
			prototype.add_function(name.clone(), move |args: Rest<Value>| (*function)(&args));
		}

		Ok(Self {
			prototype,
			engine,
			missing_key,
			media_type: config.media_type.clone().filter(|m| !m.is_empty()),
		})
	}

	/// Compile `content` into a [`Template`] called `name`.
	pub fn parse(&self, name: &str, content: &str) -> ThothResult<Template> {
		let mut env = self.prototype.clone();
		env.add_template_owned(name.to_string(), content.to_string())
			.map_err(|e| {
				ThothError::TemplateParse {
					name: name.to_string(),
					reason: e.to_string(),
				}
			})?;

		Ok(Template::new(name, env, self.media_type.clone()))
	}

	pub fn engine(&self) -> Engine {
		self.engine
	}

	pub fn missing_key(&self) -> MissingKey {
		self.missing_key
	}
}

fn syntax_config(config: &ParserConfig) -> ThothResult<Option<SyntaxConfig>> {
	let left = config.left_delim.as_deref().filter(|d| !d.is_empty());
	let right = config.right_delim.as_deref().filter(|d| !d.is_empty());
	if left.is_none() && right.is_none() {
		return Ok(None);
	}

	let left = left.unwrap_or(DEFAULT_LEFT_DELIM).to_string();
	let right = right.unwrap_or(DEFAULT_RIGHT_DELIM).to_string();
	SyntaxConfig::builder()
		.variable_delimiters(left.clone(), right.clone())
		.build()
		.map(Some)
		.map_err(|e| {
			ThothError::InvalidDelimiters {
				left,
				right,
				reason: e.to_string(),
			}
		})
}
