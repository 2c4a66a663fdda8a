use std::path::Path;

use crate::Model;
use crate::Parser;
use crate::ParserConfig;
use crate::Selector;
use crate::SelectorConfig;

pub(crate) fn write_file(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

pub(crate) fn parser_with(config: &ParserConfig) -> Parser {
	Parser::new(config).unwrap_or_else(|e| panic!("parser: {e}"))
}

pub(crate) fn text_parser() -> Parser {
	parser_with(&ParserConfig::default())
}

pub(crate) fn parser_config(missing_key: &str) -> ParserConfig {
	ParserConfig {
		missing_key: Some(missing_key.to_string()),
		..ParserConfig::default()
	}
}

pub(crate) fn media_parser_config(media_type: &str) -> ParserConfig {
	ParserConfig {
		media_type: Some(media_type.to_string()),
		..ParserConfig::default()
	}
}

/// A selector that parses `*.tmpl` files anywhere with default settings.
pub(crate) fn tmpl_selector() -> Selector {
	Selector::new(&[SelectorConfig::new(["**/*.tmpl"], ParserConfig::default())])
		.unwrap_or_else(|e| panic!("selector: {e}"))
}

pub(crate) fn model(value: serde_json::Value) -> Model {
	serde_json::from_value(value).unwrap_or_else(|e| panic!("model: {e}"))
}
