use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ThothError {
	#[error(transparent)]
	#[diagnostic(code(thoth::io_error))]
	Io(#[from] std::io::Error),

	#[error("invalid glob pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(thoth::invalid_pattern),
		help("patterns use glob syntax: `*` stays within one path segment, `**` crosses segments")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("`{0}` is not a valid value for missingKey")]
	#[diagnostic(
		code(thoth::invalid_missing_key),
		help("valid values: invalid, default, zero, error")
	)]
	InvalidMissingKey(String),

	#[error("invalid delimiters `{left}` and `{right}`: {reason}")]
	#[diagnostic(
		code(thoth::invalid_delimiters),
		help("delimiters must be non-empty and must not clash with `{{%` or `{{#`")
	)]
	InvalidDelimiters {
		left: String,
		right: String,
		reason: String,
	},

	#[error("failed to parse config file `{path}`: {reason}")]
	#[diagnostic(
		code(thoth::config_parse),
		help("check that the file is valid YAML or TOML with `templates` and/or `samples` keys")
	)]
	ConfigParse { path: String, reason: String },

	#[error("failed to parse template `{name}`: {reason}")]
	#[diagnostic(code(thoth::template_parse))]
	TemplateParse { name: String, reason: String },

	#[error("failed to render template `{name}`: {reason}")]
	#[diagnostic(code(thoth::template_render))]
	TemplateRender { name: String, reason: String },

	#[error("rendered output is not valid {media_type}: {reason}")]
	#[diagnostic(
		code(thoth::invalid_output),
		help("set `mediaType` on the parser if this template does not produce {media_type}")
	)]
	InvalidOutput { media_type: String, reason: String },

	#[error("failed to load sample `{path}`: {reason}")]
	#[diagnostic(code(thoth::sample_load))]
	SampleLoad { path: String, reason: String },

	#[error("failed to read `{path}`: {source}")]
	#[diagnostic(code(thoth::read_file))]
	ReadFile {
		path: String,
		source: std::io::Error,
	},

	#[error("failed to walk `{path}`: {reason}")]
	#[diagnostic(code(thoth::walk))]
	Walk { path: String, reason: String },
}

pub type ThothResult<T> = Result<T, ThothError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
