use tracing::info;

use super::{commit, Mode, Report};
use crate::{config::Config, feed, fetch::Fetcher, render, splice::Markers, Result};

/// Fetches the channel feed and rewrites the video region with its newest entries.
///
/// Unlike the repository run there is nothing to skip: if the feed can't be
/// fetched the whole run fails.
pub async fn run(config: &Config, fetcher: &Fetcher, mode: Mode) -> Result<Report> {
	let url = config.youtube.feed_url();
	info!(url = url.as_str(), "fetching video feed");
	let xml = fetcher.get_text(&url).await?;

	let videos = feed::parse_entries(&xml, config.youtube.count);
	info!(count = videos.len(), "found videos");

	let fragments = render::join(&videos, render::video_card);
	let markers = Markers::named(&config.youtube.marker);
	let document = commit(&config.document, &markers, &fragments, mode)?;
	Ok(Report {
		rendered: videos.len(),
		skipped: 0,
		document,
	})
}
