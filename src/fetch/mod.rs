use std::time::Duration;

use http_cache_reqwest::{CACacheManager, Cache, HttpCache, HttpCacheOptions};
use reqwest::{header::ACCEPT, Client, Response, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{config::FetchOptions, Error, Result};

type RequestOutcome = Result<Response, reqwest_middleware::Error>;

/// Sequential HTTP client shared by every request of a run.
///
/// Each call gets its own timeout and is retried with exponential backoff on
/// transport errors, `429` and `5xx`. Any other non-success status fails at once.
pub struct Fetcher {
	client: ClientWithMiddleware,
	timeout: Duration,
	max_attempts: u32,
	backoff_base: Duration,
}

impl Fetcher {
	pub fn new(options: &FetchOptions) -> Result<Self> {
		let client = Client::builder()
			.user_agent(options.user_agent.as_str())
			.build()?;
		let mut client = ClientBuilder::new(client);
		if options.http_cache {
			client = client.with(Cache(HttpCache {
				mode: http_cache_reqwest::CacheMode::Default,
				manager: CACacheManager::default(),
				options: HttpCacheOptions::default(),
			}));
		}
		Ok(Self {
			client: client.build(),
			timeout: Duration::from_secs(options.timeout_secs),
			max_attempts: options.max_attempts.max(1),
			backoff_base: Duration::from_millis(options.backoff_base_ms),
		})
	}

	/// GETs `url` and decodes the body as JSON.
	pub async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &'static str) -> Result<T> {
		let body = self.get(url, Some(accept)).await?;
		serde_json::from_str(&body).map_err(|source| Error::Json {
			url: url.to_string(),
			source,
		})
	}

	pub async fn get_text(&self, url: &str) -> Result<String> {
		self.get(url, None).await
	}

	async fn get(&self, url: &str, accept: Option<&'static str>) -> Result<String> {
		let response = self.send(url, accept).await?;
		response.text().await.map_err(|e| Error::FetchFailed {
			url: url.to_string(),
			reason: e.to_string(),
		})
	}

	async fn send(&self, url: &str, accept: Option<&'static str>) -> Result<Response> {
		let mut attempt = 0;
		loop {
			let mut request = self.client.get(url).timeout(self.timeout);
			if let Some(accept) = accept {
				request = request.header(ACCEPT, accept);
			}
			let outcome: RequestOutcome = request.send().await;
			attempt += 1;

			let retryable = match &outcome {
				Ok(response) => is_transient(response.status()),
				Err(_) => true,
			};
			if !retryable || attempt >= self.max_attempts {
				return match outcome {
					Ok(response) if response.status().is_success() => {
						debug!(url, status = %response.status(), "fetched");
						Ok(response)
					}
					Ok(response) => Err(Error::FetchFailed {
						url: url.to_string(),
						reason: format!("status {}", response.status()),
					}),
					Err(e) => Err(Error::FetchFailed {
						url: url.to_string(),
						reason: e.to_string(),
					}),
				};
			}

			let backoff = self.backoff(attempt);
			match &outcome {
				Ok(response) => warn!(url, attempt, status = %response.status(), ?backoff, "request failed, retrying after backoff"),
				Err(e) => warn!(url, attempt, error = %e, ?backoff, "request failed, retrying after backoff"),
			}
			tokio::time::sleep(backoff).await;
		}
	}

	/// Delay after the `attempt`-th failed try: the base, doubled per further try.
	fn backoff(&self, attempt: u32) -> Duration {
		self.backoff_base
			.checked_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
			.unwrap_or(Duration::MAX)
	}
}

fn is_transient(status: StatusCode) -> bool {
	status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}
