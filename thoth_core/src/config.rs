use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::KeyValues;
use crate::Matcher;
use crate::Model;
use crate::SelectorConfig;
use crate::ThothError;
use crate::ThothResult;
use crate::first_file;
use crate::up_search;

/// Supported config file names in discovery order (highest precedence
/// first). Each directory from the scan root upwards is checked for all of
/// them before moving to its parent.
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [".thoth.yaml", ".thoth.yml", ".thoth.toml"];

/// Configuration loaded from a `.thoth.yaml` (or `.yml` / `.toml`) file.
///
/// ```yaml
/// samples: ["**/*.sample.json"]
///
/// defaults:
///   region: us-east
///
/// overrides:
///   env: test
///
/// gitignore: false
///
/// templates:
///   - patterns: ["**/*.html.tmpl"]
///     parser:
///       engine: html
///       mediaType: text/html
///   - patterns: ["**/*.json.tmpl"]
///     parser:
///       missingKey: zero
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThothConfig {
	/// Globs for sample model files. A sample is rendered through every
	/// template in the same directory whose file name or file stem prefixes
	/// the sample's file name.
	#[serde(default)]
	pub samples: Vec<String>,
	/// Pattern sets and their parser configuration, checked in order.
	#[serde(default)]
	pub templates: Vec<SelectorConfig>,
	/// Values filled into every sample model that lacks them.
	#[serde(default)]
	pub defaults: Model,
	/// Values forced onto every sample model.
	#[serde(default)]
	pub overrides: Model,
	/// When true, files ignored by `.gitignore` are skipped during the scan.
	#[serde(default)]
	pub gitignore: bool,
}

impl ThothConfig {
	/// Search `start` and each of its ancestors for a config file.
	pub fn discover(start: &Path) -> ThothResult<Option<PathBuf>> {
		up_search(start, &[first_file(CONFIG_FILE_CANDIDATES)])
	}

	/// Read and decode a config file. The format follows the extension:
	/// `.toml` is TOML, anything else is YAML.
	pub fn read(path: &Path) -> ThothResult<Self> {
		let content = std::fs::read_to_string(path)?;
		let is_toml = path
			.extension()
			.and_then(|e| e.to_str())
			.is_some_and(|e| e.eq_ignore_ascii_case("toml"));

		if is_toml {
			Self::from_toml_str(&content, path)
		} else {
			Self::from_yaml_str(&content, path)
		}
	}

	/// Discover and read the nearest config file. Returns `None` when there is
	/// no config file between `start` and the filesystem root.
	pub fn load(start: &Path) -> ThothResult<Option<(PathBuf, Self)>> {
		let Some(path) = Self::discover(start)? else {
			return Ok(None);
		};

		let config = Self::read(&path)?;
		Ok(Some((path, config)))
	}

	fn from_yaml_str(content: &str, path: &Path) -> ThothResult<Self> {
		// An empty YAML document decodes as null rather than an empty mapping.
		if content.trim().is_empty() {
			return Ok(Self::default());
		}

		serde_yaml_ng::from_str(content).map_err(|e| {
			ThothError::ConfigParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})
	}

	fn from_toml_str(content: &str, path: &Path) -> ThothResult<Self> {
		toml::from_str(content).map_err(|e| {
			ThothError::ConfigParse {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})
	}

	/// Compile the sample globs.
	pub fn sample_matcher(&self) -> ThothResult<Matcher> {
		Matcher::new(&self.samples)
	}

	pub fn default_values(&self) -> KeyValues {
		KeyValues::from(&self.defaults)
	}

	pub fn override_values(&self) -> KeyValues {
		KeyValues::from(&self.overrides)
	}
}
