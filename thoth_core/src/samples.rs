use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::Model;
use crate::ThothError;
use crate::ThothResult;

/// Sample model files found during a scan, loaded lazily and cached for the
/// rest of that scan.
#[derive(Debug, Default)]
pub struct Samples {
	paths: BTreeMap<String, PathBuf>,
	loaded: HashMap<String, Result<Model, String>>,
}

impl Samples {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register the sample with relative `name` located at `path`.
	pub fn add(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
		self.paths.insert(name.into(), path.into());
	}

	pub fn len(&self) -> usize {
		self.paths.len()
	}

	pub fn is_empty(&self) -> bool {
		self.paths.is_empty()
	}

	/// Names of the samples that belong to the template called `template`, in
	/// name order.
	pub fn matching(&self, template: &str) -> Vec<String> {
		self.paths
			.keys()
			.filter(|sample| sample_belongs_to(template, sample))
			.cloned()
			.collect()
	}

	/// Load the sample called `name`.
	///
	/// The outer result fails only when the file can't be read. A file that
	/// isn't UTF-8 or can't be decoded into a model is a per-sample failure and comes back as
	/// the inner error. Both outcomes are cached.
	pub fn load(&mut self, name: &str) -> ThothResult<Result<&Model, ThothError>> {
		let Some(path) = self.paths.get(name) else {
			return Ok(Err(ThothError::SampleLoad {
				path: name.to_string(),
				reason: "no sample with this name was found".to_string(),
			}));
		};

		if !self.loaded.contains_key(name) {
			let bytes = std::fs::read(path).map_err(|source| {
				ThothError::ReadFile {
					path: path.display().to_string(),
					source,
				}
			})?;
			let decoded = String::from_utf8(bytes)
				.map_err(|e| format!("file is not valid UTF-8: {e}"))
				.and_then(|content| decode_sample(path, &content));
			self.loaded.insert(name.to_string(), decoded);
		}

		match &self.loaded[name] {
			Ok(model) => Ok(Ok(model)),
			Err(reason) => {
				Ok(Err(ThothError::SampleLoad {
					path: name.to_string(),
					reason: reason.clone(),
				}))
			}
		}
	}
}

/// Split a `/` separated relative name into its directory and file name.
fn split_name(name: &str) -> (&str, &str) {
	name.rsplit_once('/').unwrap_or(("", name))
}

/// A sample belongs to a template when both sit in the same directory and
/// the sample's file name starts with the template's file name or with its
/// file stem.
pub(crate) fn sample_belongs_to(template: &str, sample: &str) -> bool {
	let (template_dir, template_file) = split_name(template);
	let (sample_dir, sample_file) = split_name(sample);
	if template_dir != sample_dir || template_file.is_empty() {
		return false;
	}

	let stem = template_file
		.rsplit_once('.')
		.map_or(template_file, |(stem, _)| stem);

	sample_file.starts_with(template_file) || (!stem.is_empty() && sample_file.starts_with(stem))
}

fn decode_sample(path: &Path, content: &str) -> Result<Model, String> {
	let format = path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();

	match format.as_str() {
		"json" => serde_json::from_str(content).map_err(|e| e.to_string()),
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
		"toml" => toml::from_str(content).map_err(|e| e.to_string()),
		other => {
			Err(format!(
				"unsupported sample format `{other}` (supported formats: json, yaml, yml, toml)"
			))
		}
	}
}
