use std::path::PathBuf;

#[cfg(feature = "cli")]
use figment::{
	providers::{Env, Format, Json, Serialized, Toml},
	Figment, Profile,
};

/// Name of the configuration file looked up in the XDG config dirs and the
/// working directory.
pub const CONFIG_FILE: &str = "pagesplice.toml";

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
	/// The HTML document whose marker regions get rewritten.
	pub document: PathBuf,
	pub fetch: FetchOptions,
	pub github: GithubOptions,
	/// Repositories to show, in display order.
	pub repos: Vec<RepoEntry>,
	pub youtube: YoutubeOptions,
	pub images: ImageOptions,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			document: PathBuf::from("index.html"),
			fetch: FetchOptions::default(),
			github: GithubOptions::default(),
			repos: Vec::new(),
			youtube: YoutubeOptions::default(),
			images: ImageOptions::default(),
		}
	}
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FetchOptions {
	pub user_agent: String,
	/// Per-request timeout.
	pub timeout_secs: u64,
	/// Total tries per request, including the first one.
	pub max_attempts: u32,
	/// Delay before the first retry; doubled on each further retry.
	pub backoff_base_ms: u64,
	/// Keep an on-disk HTTP cache so conditional requests can be answered with 304s.
	pub http_cache: bool,
}

impl Default for FetchOptions {
	fn default() -> Self {
		Self {
			user_agent: "CodeWithStu-Site".to_string(),
			timeout_secs: 10,
			max_attempts: 3,
			backoff_base_ms: 500,
			http_cache: false,
		}
	}
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GithubOptions {
	pub api_base: String,
	/// Region name; the document must contain `<!-- {marker}_START -->` and `<!-- {marker}_END -->`.
	pub marker: String,
}

impl Default for GithubOptions {
	fn default() -> Self {
		Self {
			api_base: "https://api.github.com".to_string(),
			marker: "REPOS".to_string(),
		}
	}
}

/// One configured repository.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
	pub url: String,
	/// Replaces the description GitHub reports.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, alias = "goalText", skip_serializing_if = "Option::is_none")]
	pub goal_text: Option<String>,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct YoutubeOptions {
	pub channel_id: String,
	pub feed_base: String,
	/// Maximum number of videos rendered.
	pub count: usize,
	pub marker: String,
}

impl YoutubeOptions {
	#[must_use]
	pub fn feed_url(&self) -> String {
		format!("{}?channel_id={}", self.feed_base, self.channel_id)
	}
}

impl Default for YoutubeOptions {
	fn default() -> Self {
		Self {
			channel_id: "UCF5dh7bm49bpsZjWHYDG4Lg".to_string(),
			feed_base: "https://www.youtube.com/feeds/videos.xml".to_string(),
			count: 3,
			marker: "VIDEOS".to_string(),
		}
	}
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ImageOptions {
	pub source: PathBuf,
	pub out_dir: PathBuf,
	/// Square edge lengths, in pixels.
	pub sizes: Vec<u32>,
	/// File name prefix of the generated variants.
	pub stem: String,
}

impl Default for ImageOptions {
	fn default() -> Self {
		Self {
			source: PathBuf::from("static/profile.png"),
			out_dir: PathBuf::from("static"),
			sizes: vec![100, 200, 400],
			stem: "profile".to_string(),
		}
	}
}

/// Layers defaults, the XDG config file, `./pagesplice.toml`, every explicit
/// path and finally `PAGESPLICE_*` environment variables.
///
/// Paths ending in `.json` are read as JSON, which lets a plain
/// `{"repos": [...]}` list be passed in directly.
#[cfg(feature = "cli")]
#[must_use]
pub fn figment(paths: &[PathBuf]) -> Figment {
	let mut config = Figment::new().merge(Serialized::from(Config::default(), Profile::Default));
	if let Ok(xdg) = xdg::BaseDirectories::new() {
		if let Some(location) = xdg.find_config_file(CONFIG_FILE) {
			config = config.merge(Toml::file(location));
		}
	}
	config = config.merge(Toml::file(CONFIG_FILE));
	for location in paths {
		config = match location.extension().and_then(|ext| ext.to_str()) {
			Some("json") => config.merge(Json::file(location)),
			_ => config.merge(Toml::file(location)),
		};
	}
	config.merge(Env::prefixed("PAGESPLICE_").split("__"))
}

#[cfg(all(test, feature = "cli"))]
mod tests {
	use figment::{
		providers::{Format, Json, Serialized, Toml},
		Figment, Profile,
	};

	use super::{Config, RepoEntry};

	fn defaults() -> Figment {
		Figment::new().merge(Serialized::from(Config::default(), Profile::Default))
	}

	#[test]
	fn toml_overrides_defaults() {
		let config: Config = defaults()
			.merge(Toml::string(
				r#"
				document = "site/index.html"

				[fetch]
				max_attempts = 5

				[youtube]
				count = 6

				[[repos]]
				url = "https://github.com/octo/one"
				goal_text = "Star one"
				"#,
			))
			.extract()
			.unwrap();
		assert_eq!(config.document.to_str(), Some("site/index.html"));
		assert_eq!(config.fetch.max_attempts, 5);
		assert_eq!(config.fetch.timeout_secs, 10);
		assert_eq!(config.youtube.count, 6);
		assert_eq!(config.youtube.marker, "VIDEOS");
		assert_eq!(
			config.repos,
			[RepoEntry {
				url: "https://github.com/octo/one".to_string(),
				description: None,
				goal_text: Some("Star one".to_string()),
			}]
		);
	}

	#[test]
	fn reads_plain_repos_json() {
		let config: Config = defaults()
			.merge(Json::string(
				r#"{"repos": [
					{"url": "https://github.com/octo/one", "description": "Mine", "goalText": "Visit"},
					{"url": "https://github.com/octo/two"}
				]}"#,
			))
			.extract()
			.unwrap();
		assert_eq!(config.repos.len(), 2);
		assert_eq!(config.repos[0].description.as_deref(), Some("Mine"));
		assert_eq!(config.repos[0].goal_text.as_deref(), Some("Visit"));
		assert_eq!(config.repos[1].goal_text, None);
		assert_eq!(config.github.api_base, "https://api.github.com");
	}

	#[test]
	fn feed_url_carries_channel_id() {
		let config = Config::default();
		assert_eq!(
			config.youtube.feed_url(),
			"https://www.youtube.com/feeds/videos.xml?channel_id=UCF5dh7bm49bpsZjWHYDG4Lg"
		);
	}
}
