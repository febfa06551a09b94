use tracing::{info, warn};

use super::{commit, Mode, Report};
use crate::{config::Config, fetch::Fetcher, github, render, splice::Markers, Result};

/// Fetches every configured repository in order and rewrites the repository region.
///
/// A bad URL or a failed fetch drops that entry only.
pub async fn run(config: &Config, fetcher: &Fetcher, mode: Mode) -> Result<Report> {
	info!(count = config.repos.len(), "fetching repository data");

	let mut repos = Vec::with_capacity(config.repos.len());
	let mut skipped = 0;
	for entry in &config.repos {
		match github::fetch_repo(fetcher, &config.github.api_base, entry).await {
			Ok(repo) => repos.push(repo),
			Err(e) => {
				warn!(url = entry.url.as_str(), error = %e, "skipping repository");
				skipped += 1;
			}
		}
	}
	info!(fetched = repos.len(), skipped, "fetched repositories");

	let fragments = render::join(&repos, render::repo_card);
	let markers = Markers::named(&config.github.marker);
	let document = commit(&config.document, &markers, &fragments, mode)?;
	Ok(Report {
		rendered: repos.len(),
		skipped,
		document,
	})
}
