use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong during a run.
///
/// `InvalidLocator`, `FetchFailed` and `ParseIncomplete` are per-entry: the
/// pipelines log them and move on to the next entry. The rest end the run.
#[derive(Error, Debug)]
pub enum Error {
	#[error("not a GitHub repository URL: {0}")]
	InvalidLocator(String),
	#[error("fetching {url} failed: {reason}")]
	FetchFailed { url: String, reason: String },
	#[error("entry has no <{0}>")]
	ParseIncomplete(&'static str),
	#[error("marker pair {start} ... {end} not found in the document")]
	MarkerNotFound { start: String, end: String },
	#[error("{} is being updated by another run (lock file {})", .document.display(), .lock.display())]
	DocumentLocked { document: PathBuf, lock: PathBuf },
	#[error("invalid JSON from {url}: {source}")]
	Json {
		url: String,
		source: serde_json::Error,
	},
	#[error("HTTP client: {0}")]
	Client(#[from] reqwest::Error),
	#[error("image processing: {0}")]
	Image(#[from] image::ImageError),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
