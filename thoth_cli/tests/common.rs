use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn thoth_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("thoth"));
	cmd.env("NO_COLOR", "1").env_remove("THOTH_LOG");
	cmd
}

#[allow(dead_code)]
pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
}
