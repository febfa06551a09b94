use std::{
	fs::{self, OpenOptions},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::{Error, Result};

/// Replaces `path` with `contents` so readers see either the old or the new
/// file, never a partial one.
///
/// The data goes to a temporary file next to the target, which is then renamed
/// over it. An existing target's permissions carry over.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let mut file = NamedTempFile::new_in(dir)?;
	file.write_all(contents)?;
	if let Ok(metadata) = fs::metadata(path) {
		file.as_file().set_permissions(metadata.permissions())?;
	}
	file.as_file().sync_all()?;
	file.persist(path).map_err(|e| e.error)?;
	debug!(path = %path.display(), bytes = contents.len(), "wrote");
	Ok(())
}

/// Exclusive claim on a document for the duration of a read-modify-write.
///
/// Held as `<document>.lock`, created with create-new semantics and removed on drop.
#[derive(Debug)]
pub struct DocumentLock {
	path: PathBuf,
}

impl DocumentLock {
	pub fn acquire(document: &Path) -> Result<Self> {
		let path = lock_path(document);
		match OpenOptions::new().write(true).create_new(true).open(&path) {
			Ok(mut file) => {
				writeln!(file, "{}", std::process::id())?;
				Ok(Self { path })
			}
			Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(Error::DocumentLocked {
				document: document.to_path_buf(),
				lock: path,
			}),
			Err(e) => Err(e.into()),
		}
	}

	#[cfg(test)]
	fn path(&self) -> &Path {
		&self.path
	}
}

impl Drop for DocumentLock {
	fn drop(&mut self) {
		if let Err(e) = fs::remove_file(&self.path) {
			warn!(path = %self.path.display(), error = %e, "failed to remove lock file");
		}
	}
}

fn lock_path(document: &Path) -> PathBuf {
	let mut name = document.as_os_str().to_owned();
	name.push(".lock");
	PathBuf::from(name)
}
