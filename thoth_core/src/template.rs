use std::io;

use minijinja::Environment;
use minijinja::Value;

use crate::Model;
use crate::ThothError;
use crate::ThothResult;

/// The media type assumed when a template has none configured.
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// A compiled template together with the media type of its output.
///
/// The template owns its own copy of the engine environment it was compiled
/// in, so it stays valid after the [`Parser`](crate::Parser) that produced it
/// is dropped.
#[derive(Debug, Clone)]
pub struct Template {
	name: String,
	media_type: Option<String>,
	env: Environment<'static>,
}

impl Template {
	pub(crate) fn new(name: &str, env: Environment<'static>, media_type: Option<String>) -> Self {
		Self {
			name: name.to_string(),
			media_type,
			env,
		}
	}

	/// The name supplied at parse time, usually the relative path.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The media type of rendered output, falling back to
	/// [`DEFAULT_MEDIA_TYPE`].
	pub fn media_type(&self) -> &str {
		self.media_type
			.as_deref()
			.filter(|m| !m.is_empty())
			.unwrap_or(DEFAULT_MEDIA_TYPE)
	}

	/// Render into `output`.
	pub fn execute<W: io::Write>(&self, mut output: W, model: &Model) -> ThothResult<()> {
		let rendered = self.render(model)?;
		output.write_all(rendered.as_bytes())?;

		Ok(())
	}

	/// Render into a string.
	pub fn render(&self, model: &Model) -> ThothResult<String> {
		self.compiled()?
			.render(Value::from_serialize(model))
			.map_err(|e| self.render_error(&e))
	}

	/// Check that `output` is well formed for this template's media type.
	pub fn validate_output(&self, output: &str) -> ThothResult<()> {
		validate_media_type(self.media_type(), output)
	}

	fn compiled(&self) -> ThothResult<minijinja::Template<'_, '_>> {
		self.env
			.get_template(&self.name)
			.map_err(|e| self.render_error(&e))
	}

	fn render_error(&self, error: &minijinja::Error) -> ThothError {
		ThothError::TemplateRender {
			name: self.name.clone(),
			reason: error.to_string(),
		}
	}
}

/// Check `content` against the syntax implied by `media_type`.
///
/// JSON types (`application/json` and any `+json` suffix) must parse as JSON
/// and YAML types as YAML. Any other media type is accepted unchecked.
pub fn validate_media_type(media_type: &str, content: &str) -> ThothResult<()> {
	let essence = media_type
		.split(';')
		.next()
		.unwrap_or(media_type)
		.trim()
		.to_ascii_lowercase();

	let invalid = |reason: String| {
		ThothError::InvalidOutput {
			media_type: essence.clone(),
			reason,
		}
	};

	if essence == "application/json" || essence.ends_with("+json") {
		serde_json::from_str::<serde_json::Value>(content).map_err(|e| invalid(e.to_string()))?;
	} else if matches!(
		essence.as_str(),
		"application/yaml" | "application/x-yaml" | "text/yaml"
	) || essence.ends_with("+yaml")
	{
		serde_yaml_ng::from_str::<serde_yaml_ng::Value>(content)
			.map_err(|e| invalid(e.to_string()))?;
	}

	Ok(())
}
