use std::io;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;
use thoth_core::ParserConfig;
use thoth_core::ScanReport;
use thoth_core::SelectorConfig;
use thoth_core::TemplateResult;
use thoth_core::ThothConfig;

/// The process exit code for an invalid command line.
pub const EXIT_BAD_COMMAND_LINE: i32 = 1;
/// The process exit code for an invalid or unreadable configuration.
pub const EXIT_BAD_CONFIG: i32 = 2;
/// The process exit code when walking the tree or reading a file failed.
pub const EXIT_SCAN_FAILED: i32 = 3;
/// The process exit code when at least one template or sample failed.
pub const EXIT_TEMPLATES_FAILED: i32 = 4;

const ERROR_LABEL: &str = "ERROR";
const FAIL_LABEL: &str = "FAIL";
const PASS_LABEL: &str = "PASS";
const INDENT: &str = "  ";

#[derive(Debug, Parser)]
#[command(
	author,
	version,
	about = "Validate every template in a directory tree.",
	long_about = "thoth walks a directory tree, picks out template files by glob pattern, and \
	              compiles each one with the parser configured for it.\n\nTemplates that have \
	              sample models next to them are also rendered against those samples, and the \
	              output is checked against the template's media type.\n\nConfiguration is read \
	              from the nearest .thoth.yaml, .thoth.yml or .thoth.toml at or above the root."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct ThothCli {
	/// Root directory for file traversal. Environment variables such as
	/// `$HOME` are expanded.
	#[arg(long, short = 'R', default_value = ".")]
	pub root: String,

	/// Verbose output. Lists every template and passing sample.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Ignore any configuration files.
	#[arg(long, default_value_t = false)]
	pub no_cfg: bool,

	/// Explicit configuration file, instead of searching.
	#[arg(long, conflicts_with = "no_cfg")]
	pub cfg: Option<PathBuf>,

	/// Sample patterns, added to those from the configuration file.
	#[arg(long, short, value_delimiter = ',')]
	pub samples: Vec<String>,

	/// Template patterns. These are checked before any configured patterns
	/// and use the default parser settings.
	#[arg(long, short, value_delimiter = ',')]
	pub templates: Vec<String>,

	/// Output format for scan results.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl ThothCli {
	/// The absolute scan root with environment variables expanded.
	pub fn root_dir(&self) -> io::Result<PathBuf> {
		std::path::absolute(expand_env(&self.root))
	}

	/// Merge the command line patterns into `config`. Template patterns from
	/// the command line form the first selector entry.
	pub fn apply_to(&self, mut config: ThothConfig) -> ThothConfig {
		if !self.templates.is_empty() {
			config.templates.insert(
				0,
				SelectorConfig::new(self.templates.iter().cloned(), ParserConfig::default()),
			);
		}

		config.samples.extend(self.samples.iter().cloned());
		config
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// A single JSON document for programmatic consumption.
	Json,
}

/// Expand `$NAME` and `${NAME}` references from the process environment.
/// Unset variables expand to nothing.
pub fn expand_env(value: &str) -> String {
	expand_with(value, |name| std::env::var(name).ok())
}

/// Expand `$NAME` and `${NAME}` references using `lookup`.
pub fn expand_with(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
	let mut expanded = String::with_capacity(value.len());
	let mut rest = value;

	while let Some(index) = rest.find('$') {
		expanded.push_str(&rest[..index]);
		let after = &rest[index + 1..];

		let (name, remainder) = if let Some(braced) = after.strip_prefix('{') {
			match braced.find('}') {
				Some(end) => (&braced[..end], &braced[end + 1..]),
				None => {
					expanded.push('$');
					rest = after;
					continue;
				}
			}
		} else {
			let end = after
				.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
				.unwrap_or(after.len());
			(&after[..end], &after[end..])
		};

		if name.is_empty() {
			expanded.push('$');
		} else if let Some(value) = lookup(name) {
			expanded.push_str(&value);
		}
		rest = remainder;
	}

	expanded.push_str(rest);
	expanded
}

/// Writes a finished scan somewhere.
pub trait Reporter {
	fn report(&mut self, report: &ScanReport) -> io::Result<()>;
}

/// Plain text output, one block per template.
///
/// Without `verbose` only templates with a failure are written: the template
/// name, then an `ERROR` line for a parse failure or a `FAIL` line for each
/// failing sample. With `verbose` every template is written along with a
/// `PASS` line for each passing sample.
pub struct ConsoleReporter<W: Write> {
	out: W,
	verbose: bool,
	color: bool,
}

impl<W: Write> ConsoleReporter<W> {
	pub fn new(out: W, verbose: bool, color: bool) -> Self {
		Self {
			out,
			verbose,
			color,
		}
	}

	pub fn into_inner(self) -> W {
		self.out
	}

	fn label(&self, label: &str) -> String {
		let padded = format!("{label:<5.5}");
		if !self.color {
			return padded;
		}

		match label {
			PASS_LABEL => format!("{}", padded.green()),
			_ => format!("{}", padded.red()),
		}
	}

	fn template(&mut self, result: &TemplateResult) -> io::Result<()> {
		let mut buffer = String::new();
		let mut header_written = false;
		let mut header = |buffer: &mut String| {
			if !header_written {
				buffer.push_str(&result.name);
				buffer.push('\n');
				header_written = true;
			}
		};

		if self.verbose {
			header(&mut buffer);
		}

		if let Some(error) = &result.error {
			header(&mut buffer);
			buffer.push_str(&format!("{INDENT}{}\t{error}\n", self.label(ERROR_LABEL)));
		}

		for sample in &result.sample_results {
			match &sample.error {
				Some(error) => {
					header(&mut buffer);
					buffer.push_str(&format!(
						"{INDENT}{}\t{}\t{error}\n",
						self.label(FAIL_LABEL),
						sample.name
					));
				}
				None if self.verbose => {
					header(&mut buffer);
					buffer.push_str(&format!(
						"{INDENT}{}\t{}\n",
						self.label(PASS_LABEL),
						sample.name
					));
				}
				None => {}
			}
		}

		if buffer.is_empty() {
			return Ok(());
		}

		self.out.write_all(buffer.as_bytes())
	}
}

impl<W: Write> Reporter for ConsoleReporter<W> {
	fn report(&mut self, report: &ScanReport) -> io::Result<()> {
		for result in &report.results {
			self.template(result)?;
		}

		self.out.flush()
	}
}

/// One JSON document describing the whole scan.
///
/// ```json
/// {"ok":false,"templates":[{"name":"a.tmpl","error":null,"samples":[{"name":"a.json","error":"..."}]}]}
/// ```
pub struct JsonReporter<W: Write> {
	out: W,
}

#[derive(Serialize)]
struct JsonReport<'a> {
	ok: bool,
	templates: Vec<JsonTemplate<'a>>,
}

#[derive(Serialize)]
struct JsonTemplate<'a> {
	name: &'a str,
	error: Option<String>,
	samples: Vec<JsonSample<'a>>,
}

#[derive(Serialize)]
struct JsonSample<'a> {
	name: &'a str,
	error: Option<String>,
}

impl<W: Write> JsonReporter<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}
}

impl<W: Write> Reporter for JsonReporter<W> {
	fn report(&mut self, report: &ScanReport) -> io::Result<()> {
		let document = JsonReport {
			ok: report.is_ok(),
			templates: report
				.results
				.iter()
				.map(|result| {
					JsonTemplate {
						name: &result.name,
						error: result.error.as_ref().map(ToString::to_string),
						samples: result
							.sample_results
							.iter()
							.map(|sample| {
								JsonSample {
									name: &sample.name,
									error: sample.error.as_ref().map(ToString::to_string),
								}
							})
							.collect(),
					}
				})
				.collect(),
		};

		serde_json::to_writer(&mut self.out, &document)?;
		writeln!(self.out)?;
		self.out.flush()
	}
}
