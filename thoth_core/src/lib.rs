//! `thoth_core` is the core library for the thoth template validator. It
//! decides which files in a directory tree are templates, compiles each one
//! with the parser configured for it, and renders the compiled templates
//! against sample models.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Scan root
//!   -> UpSearch (finds the nearest .thoth.yaml walking towards /)
//!   -> ThothConfig (pattern sets + parser options + sample globs)
//!   -> Selector (first Matcher that matches a relative path picks the Parser)
//!   -> Scanner (walks the tree, reads and parses every selected file)
//!   -> Samples (renders each template against its sample models)
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration loading from `.thoth.yaml`, `.thoth.yml` or
//!   `.thoth.toml`.
//! - [`scanner`] - Tree walking and per-file result collection.
//!
//! ## Key Types
//!
//! - [`Matcher`] - A set of compiled glob patterns.
//! - [`Parser`] - A validated engine configuration that compiles templates.
//! - [`Selector`] - Ordered (Matcher, Parser) pairs, first match wins.
//! - [`Template`] - A compiled template and its output media type.
//! - [`KeyValues`] - An immutable overlay of defaults or overrides for a
//!   [`Model`].
//! - [`Scanner`] - A root directory bound to its selector and scan options.
//! - [`ScanReport`] - Every template and result a scan produced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use thoth_core::ParserConfig;
//! use thoth_core::Selector;
//! use thoth_core::SelectorConfig;
//! use thoth_core::scan;
//!
//! let selector = Selector::new(&[SelectorConfig::new(
//! 	["**/*.tmpl"],
//! 	ParserConfig::default(),
//! )])
//! .unwrap();
//!
//! let report = scan(Path::new("."), &selector).unwrap();
//! for result in &report.results {
//! 	if let Some(error) = &result.error {
//! 		eprintln!("{}: {error}", result.name);
//! 	}
//! }
//! ```
//!
//! Templates use [`minijinja`](https://docs.rs/minijinja) syntax.

pub use config::*;
pub use error::*;
pub use matcher::*;
pub use model::*;
pub use parser::*;
pub use samples::*;
pub use scanner::*;
pub use selector::*;
pub use template::*;
pub use upsearch::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod matcher;
mod model;
mod parser;
mod samples;
pub mod scanner;
mod selector;
mod template;
mod upsearch;

#[cfg(test)]
mod __fixtures;
