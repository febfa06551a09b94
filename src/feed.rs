use chrono::{DateTime, Utc};
use regex::{Captures, Regex};

use crate::{Error, Result};

lazy_static::lazy_static! {
	static ref ENTRY: Regex = Regex::new(r"<entry>([\s\S]*?)</entry>").expect("Bad entry regex");
	static ref VIDEO_ID: Regex = Regex::new(r"<yt:videoId>([^<]+)</yt:videoId>").expect("Bad videoId regex");
	static ref TITLE: Regex = Regex::new(r"<title>([^<]+)</title>").expect("Bad title regex");
	static ref PUBLISHED: Regex = Regex::new(r"<published>([^<]+)</published>").expect("Bad published regex");
	static ref ENTITY: Regex = Regex::new(r"&(amp|lt|gt|quot|#39);").expect("Bad entity regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
	pub id: String,
	pub title: String,
	pub url: String,
	pub thumbnail: String,
	pub published: Option<DateTime<Utc>>,
}

// Takes a channel's Atom feed, and returns at most `max` of its videos in feed order.
pub fn parse_entries(xml: &str, max: usize) -> Vec<Video> {
	let mut videos = Vec::new();
	for entry in ENTRY.captures_iter(xml) {
		if videos.len() >= max {
			break;
		}
		match parse_entry(&entry[1]) {
			Ok(video) => videos.push(video),
			Err(e) => tracing::debug!(error = %e, "skipping feed entry"),
		}
	}
	videos
}

fn parse_entry(entry: &str) -> Result<Video> {
	let id = field(&VIDEO_ID, entry).ok_or(Error::ParseIncomplete("yt:videoId"))?;
	let title = field(&TITLE, entry).ok_or(Error::ParseIncomplete("title"))?;
	let published = field(&PUBLISHED, entry)
		.and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok())
		.map(|date| date.with_timezone(&Utc));
	Ok(Video {
		url: format!("https://www.youtube.com/watch?v={id}"),
		thumbnail: format!("https://i.ytimg.com/vi/{id}/mqdefault.jpg"),
		title: decode_entities(title),
		id: id.to_string(),
		published,
	})
}

fn field<'a>(pattern: &Regex, entry: &'a str) -> Option<&'a str> {
	pattern.captures(entry).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Decodes the five entities feeds escape titles with. Single pass: `&amp;lt;` becomes `&lt;`.
pub fn decode_entities(text: &str) -> String {
	ENTITY
		.replace_all(text, |caps: &Captures| match &caps[1] {
			"amp" => "&",
			"lt" => "<",
			"gt" => ">",
			"quot" => "\"",
			_ => "'",
		})
		.into_owned()
}
