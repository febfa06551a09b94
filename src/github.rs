use std::str::FromStr;

use regex::Regex;
use serde::Deserialize;

use crate::{config::RepoEntry, fetch::Fetcher, Error, Result};

const ACCEPT: &str = "application/vnd.github.v3+json";

lazy_static::lazy_static! {
	static ref LOCATOR: Regex = Regex::new(r"github\.com/([^/]+)/([^/]+)").expect("Bad locator regex");
}

/// `owner/name` pulled out of a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
	pub owner: String,
	pub name: String,
}

impl Locator {
	#[must_use]
	pub fn api_url(&self, api_base: &str) -> String {
		format!("{}/repos/{}/{}", api_base.trim_end_matches('/'), self.owner, self.name)
	}
}

impl FromStr for Locator {
	type Err = Error;

	fn from_str(url: &str) -> Result<Self> {
		let captures = LOCATOR
			.captures(url)
			.ok_or_else(|| Error::InvalidLocator(url.to_string()))?;
		let name = captures[2].trim_end_matches(".git");
		if name.is_empty() {
			return Err(Error::InvalidLocator(url.to_string()));
		}
		Ok(Self {
			owner: captures[1].to_string(),
			name: name.to_string(),
		})
	}
}

/// The subset of the repository endpoint's response we use.
#[derive(Deserialize, Debug, Default)]
pub struct ApiRepo {
	pub name: Option<String>,
	pub html_url: Option<String>,
	pub description: Option<String>,
	pub stargazers_count: Option<u64>,
	pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
	pub name: String,
	pub url: String,
	pub description: String,
	pub stars: u64,
	pub language: String,
	pub goal_text: Option<String>,
}

impl Repo {
	/// Merges the API response with the configured overrides. Blank strings count as absent.
	#[must_use]
	pub fn from_api(entry: &RepoEntry, locator: &Locator, api: ApiRepo) -> Self {
		let description = non_empty(entry.description.clone())
			.or_else(|| non_empty(api.description))
			.unwrap_or_default();
		Self {
			name: non_empty(api.name).unwrap_or_else(|| locator.name.clone()),
			url: non_empty(api.html_url).unwrap_or_else(|| entry.url.clone()),
			description,
			stars: api.stargazers_count.unwrap_or(0),
			language: non_empty(api.language).unwrap_or_else(|| "Unknown".to_string()),
			goal_text: non_empty(entry.goal_text.clone()),
		}
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|s| !s.is_empty())
}

pub async fn fetch_repo(fetcher: &Fetcher, api_base: &str, entry: &RepoEntry) -> Result<Repo> {
	let locator: Locator = entry.url.parse()?;
	tracing::info!(owner = locator.owner.as_str(), name = locator.name.as_str(), "fetching repository");
	let api: ApiRepo = fetcher.get_json(&locator.api_url(api_base), ACCEPT).await?;
	Ok(Repo::from_api(entry, &locator, api))
}
