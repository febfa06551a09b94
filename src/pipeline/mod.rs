//! The fetch → render → splice → persist runs that keep the index page current.

use std::{fs, path::Path};

use tracing::info;

use crate::{
	persist::{self, DocumentLock},
	splice::{splice, Markers},
	Result,
};

pub mod repos;
pub mod videos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Replace the document on disk.
	#[default]
	Write,
	/// Leave the document alone and hand the spliced text back in the report.
	DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
	/// Fragments placed in the managed region.
	pub rendered: usize,
	/// Entries dropped because their fetch or locator failed.
	pub skipped: usize,
	/// The spliced document, in [`Mode::DryRun`] only.
	pub document: Option<String>,
}

/// Splices `fragments` into the document's region and writes it back, holding
/// the document lock while doing so.
pub(crate) fn commit(
	path: &Path,
	markers: &Markers,
	fragments: &str,
	mode: Mode,
) -> Result<Option<String>> {
	match mode {
		Mode::DryRun => {
			let document = fs::read_to_string(path)?;
			splice(&document, markers, fragments).map(Some)
		}
		Mode::Write => {
			let _lock = DocumentLock::acquire(path)?;
			let document = fs::read_to_string(path)?;
			let updated = splice(&document, markers, fragments)?;
			if updated == document {
				info!(path = %path.display(), region = markers.start.as_str(), "document already up to date");
				return Ok(None);
			}
			persist::write_atomic(path, updated.as_bytes())?;
			info!(path = %path.display(), region = markers.start.as_str(), "updated document");
			Ok(None)
		}
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::TempDir;

	use super::{commit, Mode};
	use crate::{splice::Markers, Error};

	#[test]
	fn dry_run_leaves_file_untouched() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("index.html");
		fs::write(&path, "<!-- A_START --><!-- A_END -->").unwrap();

		let document = commit(&path, &Markers::named("A"), "x", Mode::DryRun).unwrap();
		assert_eq!(document.as_deref(), Some("<!-- A_START -->\nx\n    <!-- A_END -->"));
		assert_eq!(fs::read_to_string(&path).unwrap(), "<!-- A_START --><!-- A_END -->");
	}

	#[test]
	fn missing_markers_keep_document_byte_identical() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("index.html");
		let original = "<html>\n<!-- OTHER_START -->\n<!-- OTHER_END -->\n</html>\n";
		fs::write(&path, original).unwrap();

		let outcome = commit(&path, &Markers::named("REPOS"), "<a>x</a>", Mode::Write);
		assert!(matches!(outcome, Err(Error::MarkerNotFound { .. })));
		assert_eq!(fs::read_to_string(&path).unwrap(), original);
		assert!(!dir.path().join("index.html.lock").exists());
	}

	#[test]
	fn refuses_to_write_while_locked() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("index.html");
		fs::write(&path, "<!-- A_START --><!-- A_END -->").unwrap();
		fs::write(dir.path().join("index.html.lock"), "1").unwrap();

		let outcome = commit(&path, &Markers::named("A"), "x", Mode::Write);
		assert!(matches!(outcome, Err(Error::DocumentLocked { .. })));
		assert_eq!(fs::read_to_string(&path).unwrap(), "<!-- A_START --><!-- A_END -->");
	}
}
