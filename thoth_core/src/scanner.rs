use std::path::Path;
use std::path::PathBuf;

use ignore::WalkBuilder;
use tracing::debug;
use tracing::info;

use crate::KeyValues;
use crate::Matcher;
use crate::Samples;
use crate::Selector;
use crate::Template;
use crate::ThothConfig;
use crate::ThothError;
use crate::ThothResult;

/// Options for controlling how a tree is scanned.
///
/// Use [`ScanOptions::default()`] to parse templates only, or
/// [`ScanOptions::from_config`] to construct from a [`ThothConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
	/// Files matching these patterns are sample models, not templates.
	pub samples: Matcher,
	/// Applied to each sample model as defaults before rendering.
	pub defaults: KeyValues,
	/// Applied to each sample model as overrides before rendering.
	pub overrides: KeyValues,
	/// Whether `.gitignore` rules prune the walk.
	pub respect_gitignore: bool,
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from a [`ThothConfig`], compiling its sample
	/// patterns.
	pub fn from_config(config: &ThothConfig) -> ThothResult<Self> {
		Ok(Self {
			samples: config.sample_matcher()?,
			defaults: config.default_values(),
			overrides: config.override_values(),
			respect_gitignore: config.gitignore,
		})
	}
}

/// The outcome of rendering one template against one sample model.
#[derive(Debug)]
pub struct SampleResult {
	/// Relative path of the sample file.
	pub name: String,
	/// Why loading, rendering or validating failed, if it did.
	pub error: Option<ThothError>,
}

impl SampleResult {
	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}
}

/// The outcome for one file the selector matched.
#[derive(Debug)]
pub struct TemplateResult {
	/// Relative path of the template file.
	pub name: String,
	/// The parse error, when the template didn't compile.
	pub error: Option<ThothError>,
	/// One entry per sample rendered through this template. Always empty when
	/// the template failed to parse.
	pub sample_results: Vec<SampleResult>,
}

impl TemplateResult {
	/// True when the template parsed and every sample rendered.
	pub fn is_ok(&self) -> bool {
		self.error.is_none() && self.sample_results.iter().all(SampleResult::is_ok)
	}
}

/// Everything one scan produced.
#[derive(Debug, Default)]
pub struct ScanReport {
	/// Successfully parsed templates in walk order.
	pub templates: Vec<Template>,
	/// One result per attempted file in walk order, failures included.
	pub results: Vec<TemplateResult>,
}

impl ScanReport {
	/// True when every template parsed and every sample rendered.
	pub fn is_ok(&self) -> bool {
		self.results.iter().all(TemplateResult::is_ok)
	}

	/// Number of templates that failed to parse or had a failing sample.
	pub fn failure_count(&self) -> usize {
		self.results.iter().filter(|result| !result.is_ok()).count()
	}
}

/// A root directory bound to the selector and options used to scan it.
///
/// Scanning keeps no state between calls, so [`Scanner::scan`] can be run
/// repeatedly and each call produces a fresh [`ScanReport`].
#[derive(Debug, Clone)]
pub struct Scanner {
	root: PathBuf,
	selector: Selector,
	options: ScanOptions,
}

impl Scanner {
	pub fn new(root: impl Into<PathBuf>, selector: Selector) -> Self {
		Self {
			root: root.into(),
			selector,
			options: ScanOptions::default(),
		}
	}

	#[must_use]
	pub fn with_options(mut self, options: ScanOptions) -> Self {
		self.options = options;
		self
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn scan(&self) -> ThothResult<ScanReport> {
		scan_with_options(&self.root, &self.selector, &self.options)
	}
}

/// Scan `root` and parse every file the selector matches.
pub fn scan(root: &Path, selector: &Selector) -> ThothResult<ScanReport> {
	scan_with_options(root, selector, &ScanOptions::default())
}

/// Scan `root` with the given [`ScanOptions`].
///
/// Entries are visited depth-first in file name order. Files matching no
/// selector entry are skipped. A template that fails to parse is recorded in
/// its [`TemplateResult`] and the walk carries on; only I/O failures while
/// walking or reading end the scan with an error.
pub fn scan_with_options(
	root: &Path,
	selector: &Selector,
	options: &ScanOptions,
) -> ThothResult<ScanReport> {
	let mut report = ScanReport::default();
	let mut samples = Samples::new();

	let walker = WalkBuilder::new(root)
		.standard_filters(false)
		.git_ignore(options.respect_gitignore)
		.require_git(false)
		.sort_by_file_name(|a, b| a.cmp(b))
		.build();

	for entry in walker {
		let entry = entry.map_err(|e| {
			ThothError::Walk {
				path: root.display().to_string(),
				reason: e.to_string(),
			}
		})?;
		let path = entry.path();
		if !is_regular_file(&entry) {
			continue;
		}

		let name = relative_name(root, path);
		if options.samples.is_match(&name) {
			debug!(file = %name, "found sample");
			samples.add(name, path);
			continue;
		}

		let Some(parser) = selector.select(&name) else {
			debug!(file = %name, "no parser selected, skipping");
			continue;
		};

		let bytes = std::fs::read(path).map_err(|source| {
			ThothError::ReadFile {
				path: path.display().to_string(),
				source,
			}
		})?;
		let parsed = match String::from_utf8(bytes) {
			Ok(content) => parser.parse(&name, &content),
			Err(e) => {
				Err(ThothError::TemplateParse {
					name: name.clone(),
					reason: format!("file is not valid UTF-8: {e}"),
				})
			}
		};

		match parsed {
			Ok(template) => {
				debug!(file = %name, "parsed template");
				report.templates.push(template);
				report.results.push(TemplateResult {
					name,
					error: None,
					sample_results: Vec::new(),
				});
			}
			Err(error) => {
				debug!(file = %name, %error, "template failed to parse");
				report.results.push(TemplateResult {
					name,
					error: Some(error),
					sample_results: Vec::new(),
				});
			}
		}
	}

	if !samples.is_empty() {
		let mut templates = report.templates.iter();
		for result in report.results.iter_mut().filter(|r| r.error.is_none()) {
			let Some(template) = templates.next() else {
				break;
			};
			result.sample_results = check_samples(template, &mut samples, options)?;
		}
	}

	info!(
		root = %root.display(),
		templates = report.results.len(),
		samples = samples.len(),
		failures = report.failure_count(),
		"scan complete"
	);

	Ok(report)
}

/// Render `template` through every sample that belongs to it.
fn check_samples(
	template: &Template,
	samples: &mut Samples,
	options: &ScanOptions,
) -> ThothResult<Vec<SampleResult>> {
	let mut results = Vec::new();

	for name in samples.matching(template.name()) {
		let error = match samples.load(&name)? {
			Ok(model) => {
				let mut model = model.clone();
				options.defaults.apply_defaults(&mut model);
				options.overrides.apply_overrides(&mut model);
				template
					.render(&model)
					.and_then(|output| template.validate_output(&output))
					.err()
			}
			Err(error) => Some(error),
		};

		debug!(
			template = %template.name(),
			sample = %name,
			ok = error.is_none(),
			"checked sample"
		);
		results.push(SampleResult { name, error });
	}

	Ok(results)
}

fn is_regular_file(entry: &ignore::DirEntry) -> bool {
	match entry.file_type() {
		Some(file_type) if file_type.is_file() => true,
		Some(file_type) if file_type.is_symlink() => entry.path().is_file(),
		_ => false,
	}
}

/// The `/` separated path of `path` relative to `root`.
pub fn relative_name(root: &Path, path: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.to_string_lossy()
		.replace('\\', "/")
}
