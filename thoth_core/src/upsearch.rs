use std::io::ErrorKind;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ThothResult;

/// What a search predicate decided about one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep<T> {
	/// No opinion, keep ascending.
	Continue,
	/// End the search successfully with this value.
	Stop(T),
}

/// Walk from `start` up to the filesystem root, applying each predicate in
/// order to every directory on the way.
///
/// Returns `Ok(Some(value))` for the first [`SearchStep::Stop`], the first
/// error any predicate returns, or `Ok(None)` once the root has been checked
/// without a result. `start` is made absolute and lexically cleaned first.
pub fn up_search<T, F>(start: &Path, predicates: &[F]) -> ThothResult<Option<T>>
where
	F: Fn(&Path) -> ThothResult<SearchStep<T>>,
{
	if predicates.is_empty() {
		return Ok(None);
	}

	let start = clean(&std::path::absolute(start)?);
	for dir in start.ancestors() {
		for predicate in predicates {
			if let SearchStep::Stop(value) = predicate(dir)? {
				return Ok(Some(value));
			}
		}
	}

	Ok(None)
}

/// A predicate for [`up_search`] that stops at the first of `names` present
/// in a directory as something other than a directory, yielding its
/// absolute path.
///
/// Candidates that don't exist are skipped. Any other failure to stat a
/// candidate, such as a permission error, ends the search with that error.
pub fn first_file<I, S>(names: I) -> impl Fn(&Path) -> ThothResult<SearchStep<PathBuf>>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let names: Vec<String> = names.into_iter().map(Into::into).collect();

	move |dir: &Path| {
		for name in &names {
			let candidate = dir.join(name);
			match std::fs::metadata(&candidate) {
				Ok(metadata) if !metadata.is_dir() => return Ok(SearchStep::Stop(candidate)),
				Ok(_) => {}
				Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {}
				Err(e) => return Err(e.into()),
			}
		}

		Ok(SearchStep::Continue)
	}
}

/// Remove `.` and resolve `..` components of an absolute path without
/// touching the filesystem.
fn clean(path: &Path) -> PathBuf {
	let mut cleaned = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				cleaned.pop();
			}
			other => cleaned.push(other),
		}
	}
	cleaned
}
