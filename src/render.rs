//! HTML fragments for the managed regions of the site's index page.

use chrono::{DateTime, Utc};

use crate::{feed::Video, github::Repo};

const STAR_ICON: &str = r#"<svg viewBox="0 0 16 16" width="14" height="14" aria-hidden="true"><path fill="currentColor" d="M8 .25a.75.75 0 0 1 .673.418l1.882 3.815 4.21.612a.75.75 0 0 1 .416 1.279l-3.046 2.97.719 4.192a.751.751 0 0 1-1.088.791L8 12.347l-3.766 1.98a.75.75 0 0 1-1.088-.79l.72-4.194L.818 6.374a.75.75 0 0 1 .416-1.28l4.21-.611L7.327.668A.75.75 0 0 1 8 .25Z"></path></svg>"#;

const DEFAULT_LANGUAGE_COLOR: &str = "#888";

/// Escapes `&`, `<`, `>` and `"` so the text is inert both in element bodies and attribute values.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			c => escaped.push(c),
		}
	}
	escaped
}

/// GitHub's linguist color for a language.
pub fn language_color(language: &str) -> &'static str {
	match language {
		"C#" => "#178600",
		"JavaScript" => "#f1e05a",
		"TypeScript" => "#3178c6",
		"Go" => "#00ADD8",
		"Python" => "#3572A5",
		"Rust" => "#dea584",
		"Java" => "#b07219",
		_ => DEFAULT_LANGUAGE_COLOR,
	}
}

/// `999` stays `999`, `1500` becomes `1.5k`, `2000` becomes `2k`.
pub fn format_count(count: u64) -> String {
	if count < 1000 {
		return count.to_string();
	}
	// Counts ending in 250 or 750 are exact binary halves and round up; the
	// rest round to the nearest tenth of the f64 quotient.
	let thousands = if count % 500 == 250 {
		let tenths = count / 100 + 1;
		format!("{}.{}", tenths / 10, tenths % 10)
	} else {
		#[allow(clippy::cast_precision_loss)]
		let quotient = count as f64 / 1000.0;
		format!("{quotient:.1}")
	};
	let thousands = thousands.strip_suffix(".0").unwrap_or(&thousands);
	format!("{thousands}k")
}

/// `Jan 5, 2024`
pub fn format_date(date: &DateTime<Utc>) -> String {
	date.format("%b %-d, %Y").to_string()
}

pub fn repo_card(repo: &Repo) -> String {
	let goal = repo
		.goal_text
		.as_deref()
		.map(|goal| format!(r#" data-fast-goal="{}""#, escape_html(goal)))
		.unwrap_or_default();
	format!(
		r#"
      <a href="{url}" target="_blank" rel="noopener" class="repo-card"{goal}>
        <div class="repo-info">
          <h3>{name}</h3>
          <p class="repo-desc">{description}</p>
          <div class="repo-meta">
            <span class="repo-lang" style="--lang-color: {color}">{language}</span>
            <span class="repo-stars">
              {STAR_ICON}
              {stars}
            </span>
          </div>
        </div>
      </a>"#,
		url = escape_html(&repo.url),
		name = escape_html(&repo.name),
		description = escape_html(&repo.description),
		color = language_color(&repo.language),
		language = escape_html(&repo.language),
		stars = format_count(repo.stars),
	)
}

pub fn video_card(video: &Video) -> String {
	let title = escape_html(&video.title);
	let published = video.published.as_ref().map(format_date).unwrap_or_default();
	format!(
		r#"
      <a href="{url}" target="_blank" rel="noopener" class="video-card">
        <img src="{thumbnail}" alt="{title}" loading="lazy" width="320" height="180">
        <div class="video-info">
          <h3>{title}</h3>
          <time>{published}</time>
        </div>
      </a>"#,
		url = escape_html(&video.url),
		thumbnail = escape_html(&video.thumbnail),
	)
}

/// Renders every item and joins the fragments with newlines, keeping input order.
pub fn join<T>(items: &[T], card: impl Fn(&T) -> String) -> String {
	items.iter().map(card).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
	use chrono::{TimeZone, Utc};

	use super::*;

	fn repo(name: &str) -> Repo {
		Repo {
			name: name.to_string(),
			url: format!("https://github.com/octo/{name}"),
			description: String::new(),
			stars: 0,
			language: "Unknown".to_string(),
			goal_text: None,
		}
	}

	#[test]
	fn escapes_markup() {
		assert_eq!(
			escape_html(r#"<script>alert("x & y")</script>"#),
			"&lt;script&gt;alert(&quot;x &amp; y&quot;)&lt;/script&gt;"
		);
		assert_eq!(escape_html("it's plain"), "it's plain");
	}

	#[test]
	fn formats_counts() {
		assert_eq!(format_count(0), "0");
		assert_eq!(format_count(999), "999");
		assert_eq!(format_count(1000), "1k");
		assert_eq!(format_count(1500), "1.5k");
		assert_eq!(format_count(2000), "2k");
		assert_eq!(format_count(12345), "12.3k");
		assert_eq!(format_count(1250), "1.3k");
		assert_eq!(format_count(1750), "1.8k");
		assert_eq!(format_count(2250), "2.3k");
		assert_eq!(format_count(3750), "3.8k");
		assert_eq!(format_count(999_750), "999.8k");
		// 1.15 is stored as 1.1499..., so it rounds down.
		assert_eq!(format_count(1150), "1.1k");
		assert_eq!(format_count(1950), "1.9k");
	}

	#[test]
	fn formats_dates() {
		let date = Utc.with_ymd_and_hms(2024, 1, 5, 23, 59, 0).unwrap();
		assert_eq!(format_date(&date), "Jan 5, 2024");
		let date = Utc.with_ymd_and_hms(2023, 11, 15, 0, 0, 0).unwrap();
		assert_eq!(format_date(&date), "Nov 15, 2023");
	}

	#[test]
	fn falls_back_to_default_color() {
		assert_eq!(language_color("Rust"), "#dea584");
		assert_eq!(language_color("C#"), "#178600");
		assert_eq!(language_color("Unknown"), "#888");
		assert_eq!(language_color("rust"), "#888");
	}

	#[test]
	fn repo_card_escapes_upstream_text() {
		let card = repo_card(&Repo {
			description: "<script>steal()</script>".to_string(),
			stars: 1500,
			language: "Rust".to_string(),
			goal_text: Some(r#"say "hi""#.to_string()),
			..repo("tool")
		});
		assert!(card.contains("&lt;script&gt;steal()&lt;/script&gt;"));
		assert!(!card.contains("<script>"));
		assert!(card.contains(r#"data-fast-goal="say &quot;hi&quot;""#));
		assert!(card.contains("--lang-color: #dea584"));
		assert!(card.contains("1.5k"));
		assert!(card.contains(r#"<a href="https://github.com/octo/tool""#));
	}

	#[test]
	fn repo_card_omits_missing_goal() {
		assert!(!repo_card(&repo("tool")).contains("data-fast-goal"));
	}

	#[test]
	fn video_card_shows_title_and_date() {
		let card = video_card(&Video {
			id: "abc".to_string(),
			title: "A <b> & \"c\"".to_string(),
			url: "https://www.youtube.com/watch?v=abc".to_string(),
			thumbnail: "https://i.ytimg.com/vi/abc/mqdefault.jpg".to_string(),
			published: Some(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()),
		});
		assert!(card.contains(r#"alt="A &lt;b&gt; &amp; &quot;c&quot;""#));
		assert!(card.contains("<h3>A &lt;b&gt; &amp; &quot;c&quot;</h3>"));
		assert!(card.contains("<time>Mar 9, 2024</time>"));
	}

	#[test]
	fn join_keeps_order() {
		let repos = [repo("one"), repo("two"), repo("three")];
		let html = join(&repos, repo_card);
		let one = html.find("<h3>one</h3>").unwrap();
		let two = html.find("<h3>two</h3>").unwrap();
		let three = html.find("<h3>three</h3>").unwrap();
		assert!(one < two && two < three);
		assert_eq!(html.matches("class=\"repo-card\"").count(), 3);
	}
}
