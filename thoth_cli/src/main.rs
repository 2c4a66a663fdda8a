use std::io;
use std::path::Path;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use thoth_cli::ConsoleReporter;
use thoth_cli::EXIT_BAD_COMMAND_LINE;
use thoth_cli::EXIT_BAD_CONFIG;
use thoth_cli::EXIT_SCAN_FAILED;
use thoth_cli::EXIT_TEMPLATES_FAILED;
use thoth_cli::JsonReporter;
use thoth_cli::OutputFormat;
use thoth_cli::Reporter;
use thoth_cli::ThothCli;
use thoth_core::ScanOptions;
use thoth_core::Scanner;
use thoth_core::Selector;
use thoth_core::ThothConfig;
use thoth_core::ThothError;
use thoth_core::ThothResult;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = match ThothCli::try_parse() {
		Ok(args) => args,
		Err(e) => {
			// `--help` and `--version` come through here too.
			let code = if e.use_stderr() {
				EXIT_BAD_COMMAND_LINE
			} else {
				0
			};
			e.print().ok();
			process::exit(code);
		}
	};

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	process::exit(run(&args));
}

fn init_tracing(verbose: bool, use_color: bool) {
	let fallback = if verbose {
		"warn,thoth=debug,thoth_core=debug"
	} else {
		"warn"
	};

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_env("THOTH_LOG").unwrap_or_else(|_| fallback.into()))
		.with(
			tracing_subscriber::fmt::layer()
				.with_writer(io::stderr)
				.with_ansi(use_color)
				.without_time(),
		)
		.try_init()
		.ok();
}

fn run(args: &ThothCli) -> i32 {
	let root = match args.root_dir() {
		Ok(root) => root,
		Err(e) => {
			eprintln!("{} invalid root `{}`: {e}", colored!("error:", red), args.root);
			return EXIT_BAD_COMMAND_LINE;
		}
	};
	debug!(root = %root.display(), "resolved scan root");

	let config = match load_config(args, &root) {
		Ok(config) => args.apply_to(config),
		Err(e) => return fail(EXIT_BAD_CONFIG, e),
	};

	let selector = match Selector::new(&config.templates) {
		Ok(selector) => selector,
		Err(e) => return fail(EXIT_BAD_CONFIG, e),
	};
	debug!(entries = selector.len(), "built selector");

	if selector.is_empty() {
		eprintln!(
			"{} no template patterns configured; pass `--templates` or add `templates` to a \
			 config file",
			colored!("warning:", yellow)
		);
	}

	let options = match ScanOptions::from_config(&config) {
		Ok(options) => options,
		Err(e) => return fail(EXIT_BAD_CONFIG, e),
	};

	let report = match Scanner::new(root, selector).with_options(options).scan() {
		Ok(report) => report,
		Err(e) => return fail(EXIT_SCAN_FAILED, e),
	};

	let stdout = io::stdout().lock();
	let written = match args.format {
		OutputFormat::Text => {
			ConsoleReporter::new(stdout, args.verbose, color_enabled()).report(&report)
		}
		OutputFormat::Json => JsonReporter::new(stdout).report(&report),
	};
	if let Err(e) = written {
		eprintln!("{} unable to write report: {e}", colored!("error:", red));
		return EXIT_SCAN_FAILED;
	}

	if report.is_ok() {
		if args.verbose && args.format == OutputFormat::Text {
			eprintln!(
				"{} {} template(s) checked",
				colored!("ok:", green),
				report.results.len()
			);
		}
		0
	} else {
		EXIT_TEMPLATES_FAILED
	}
}

/// Find the configuration the command line asks for. `--no-cfg` yields the
/// empty configuration, `--cfg` reads exactly that file, and otherwise the
/// nearest config file at or above `root` is used if there is one.
fn load_config(args: &ThothCli, root: &Path) -> ThothResult<ThothConfig> {
	if args.no_cfg {
		return Ok(ThothConfig::default());
	}

	if let Some(path) = &args.cfg {
		let config = ThothConfig::read(path)?;
		if args.verbose {
			eprintln!("using config file {}", path.display());
		}
		return Ok(config);
	}

	match ThothConfig::load(root)? {
		Some((path, config)) => {
			if args.verbose {
				eprintln!("found config file {}", path.display());
			}
			Ok(config)
		}
		None => Ok(ThothConfig::default()),
	}
}

fn fail(code: i32, error: ThothError) -> i32 {
	let report: miette::Report = error.into();
	eprintln!("{report:?}");
	code
}
